pub mod error;
pub mod firestore;
pub mod memory;
pub mod navigator;
pub mod node;
pub mod path;
pub mod promise;
pub mod state;
pub mod store;
pub mod util;
pub mod worker;
