mod command;
mod config;
mod view;

use std::{
    io::{self, BufRead},
    path::PathBuf,
    process,
    sync::Arc,
    thread,
};

use clap::Parser;
use crossbeam_channel::{select, unbounded, Receiver, RecvError};
use env_logger::{Builder, Env};
use infosphere_core::{
    error::Error,
    firestore::FirestoreStore,
    memory::MemoryStore,
    navigator::Navigator,
    state::{Back, FetchReply},
};

use crate::{
    command::{Command, Target, HELP},
    config::Config,
};

const ENV_LOG: &str = "INFOSPHERE_LOG";
const ENV_LOG_STYLE: &str = "INFOSPHERE_LOG_STYLE";

/// Browse the InfoSphere catalog: titles, their subtitles and sub-subtitles.
#[derive(Debug, Parser)]
#[command(name = "infosphere", version)]
struct Args {
    /// Config file, defaults to config.json in the platform config dir.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Firestore project id, overrides the config file.
    #[arg(long)]
    project: Option<String>,
    /// Web API key, overrides the config file.
    #[arg(long)]
    api_key: Option<String>,
    /// Browse a JSON fixture instead of Firestore.
    #[arg(long, conflicts_with_all = ["project", "api_key", "config"])]
    fixture: Option<PathBuf>,
    /// Only show video links, do not hand them to the system player.
    #[arg(long)]
    no_player: bool,
}

fn main() {
    // Setup logging from the env variables, with defaults.
    Builder::from_env(
        Env::new()
            .filter_or(ENV_LOG, "info")
            .write_style(ENV_LOG_STYLE),
    )
    .init();

    let args = Args::parse();
    if let Err(err) = start(args) {
        log::error!("{}", err);
        process::exit(1);
    }
}

fn start(args: Args) -> Result<(), Error> {
    let navigator = match &args.fixture {
        Some(path) => Navigator::new(MemoryStore::load(path)?),
        None => {
            let mut config = Config::load(args.config.as_deref())?;
            if let Some(project) = args.project {
                config.project_id = project;
            }
            if let Some(api_key) = args.api_key {
                config.api_key = Some(api_key);
            }
            Navigator::new(FirestoreStore::new(config.firestore()?))
        }
    };
    Shell::new(navigator, !args.no_player).run(stdin_lines())
}

fn stdin_lines() -> Receiver<String> {
    let (sender, receiver) = unbounded();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    log::error!("failed to read input: {}", err);
                    break;
                }
            }
        }
    });
    receiver
}

enum Flow {
    Continue,
    Exit,
}

struct Shell {
    navigator: Navigator,
    use_player: bool,
}

impl Shell {
    fn new(navigator: Navigator, use_player: bool) -> Self {
        Self {
            navigator,
            use_player,
        }
    }

    fn run(mut self, lines: Receiver<String>) -> Result<(), Error> {
        let replies = self.navigator.replies().clone();
        self.navigator.initialize()?;
        self.render();

        loop {
            let flow = select! {
                recv(lines) -> line => match line {
                    Ok(line) => Ok(self.handle_line(&line)),
                    Err(_) => self.finish(),
                },
                recv(replies) -> reply => self.apply(reply),
            };
            if let Flow::Exit = flow? {
                break;
            }
        }
        Ok(())
    }

    fn apply(&mut self, reply: Result<FetchReply, RecvError>) -> Result<Flow, Error> {
        let reply = reply.map_err(|_| Error::WorkerDisconnected)?;
        self.navigator.handle_reply(reply);
        self.render();
        Ok(Flow::Continue)
    }

    /// Input closed, let the pending fetch land before leaving.
    fn finish(&mut self) -> Result<Flow, Error> {
        if self.navigator.wait_idle()?.is_some() {
            self.render();
        }
        Ok(Flow::Exit)
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        let command = match Command::parse(line) {
            Ok(command) => command,
            Err(msg) => {
                println!("{msg}, type h for help");
                return Flow::Continue;
            }
        };
        match self.handle(command) {
            Ok(flow) => flow,
            Err(Error::Busy) => {
                println!("Still loading, please wait.");
                Flow::Continue
            }
            Err(err) => {
                println!("{err}");
                Flow::Continue
            }
        }
    }

    fn handle(&mut self, command: Command) -> Result<Flow, Error> {
        match command {
            Command::Select(target) => {
                let id = self.resolve(&target)?;
                self.navigator.select(&id)?;
                self.render();
            }
            Command::Back => match self.navigator.back()? {
                Back::Level(_) => self.render(),
                Back::Exit => return Ok(Flow::Exit),
            },
            Command::Video(target) => {
                let id = self.resolve(&target)?;
                let url = self.navigator.open_node_video(&id)?;
                if self.use_player {
                    if let Err(err) = open::that(url.as_str()) {
                        log::error!("failed to start video player: {}", err);
                    }
                }
                self.render();
            }
            Command::CloseVideo => {
                if self.navigator.close_video().is_some() {
                    self.render();
                }
            }
            Command::Retry => {
                self.navigator.retry()?;
                self.render();
            }
            Command::Refresh => {
                self.navigator.refresh()?;
                self.render();
            }
            Command::List => self.render(),
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(Flow::Exit),
            Command::Nothing => {}
        }
        Ok(Flow::Continue)
    }

    fn resolve(&self, target: &Target) -> Result<Arc<str>, Error> {
        target
            .resolve(self.navigator.state().nodes())
            .ok_or_else(|| match target {
                Target::Index(index) => Error::UnknownNode(index.to_string().into()),
                Target::Id(id) => Error::UnknownNode(id.as_str().into()),
            })
    }

    fn render(&self) {
        let stdout = io::stdout();
        if let Err(err) = view::render(self.navigator.state(), &mut stdout.lock()) {
            log::error!("failed to write output: {}", err);
        }
    }
}
