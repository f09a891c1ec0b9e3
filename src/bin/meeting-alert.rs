use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};

use live_meeting_alert::clock::SystemClock;
use live_meeting_alert::command::{is_yes, Command, HELP};
use live_meeting_alert::config::{product_name, Settings};
use live_meeting_alert::controller::{Controller, DELETE_CONFIRMATION};
use live_meeting_alert::dispatch::{Action, Dispatcher, Outcome, UiEvent};
use live_meeting_alert::render::Renderer;
use live_meeting_alert::storage::{FileStore, MeetingStore, MemoryStore};
use live_meeting_alert::timer::RefreshTimer;
use live_meeting_alert::traits::{Confirm, RenderTarget};
use live_meeting_alert::utils::print_meeting_list;

const SETTINGS_FILE: &str = "meeting_alert.json";


/// Writes the dashboard into an HTML file
struct PageFile {
    path: PathBuf,
}

impl RenderTarget for PageFile {
    fn draw(&mut self, page: &str) {
        if let Err(err) = std::fs::write(&self.path, page) {
            log::warn!("Unable to write the dashboard to {:?}: {}", self.path, err);
        }
    }
}

/// The answer the user gave to the confirmation prompt
struct Answer(bool);

impl Confirm for Answer {
    fn confirm(&mut self, message: &str) -> bool {
        log::debug!("{} {}", message, if self.0 { "yes" } else { "no" });
        self.0
    }
}


#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let settings = load_settings()?;
    let store = open_store(&settings);
    let renderer = Renderer::new(Local, &product_name(), settings.refresh_seconds);
    let page = PageFile { path: settings.output_page.clone() };

    let mut controller = Controller::new(store, renderer, Box::new(SystemClock), Box::new(page));
    let dispatcher = Dispatcher::new();
    let mut timer = RefreshTimer::new(settings.refresh_period());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Dashboard is written to {:?}. Type `help` for the list of commands.", settings.output_page);

    loop {
        tokio::select! {
            _ = timer.tick() => {
                dispatcher.dispatch(&mut controller, UiEvent::Tick, &mut Answer(false));
            },
            line = lines.next_line() => {
                let line = match Input::from(line) {
                    Input::Line(line) => line,
                    Input::Skip => continue,
                    Input::End => break,
                };

                let command: Command = match line.parse() {
                    Ok(command) => command,
                    Err(err) => {
                        println!("{}", err);
                        continue;
                    },
                };

                match command {
                    Command::Quit => break,
                    Command::Help => println!("{}", HELP),
                    Command::Show => {
                        println!("---- meetings -----");
                        print_meeting_list(controller.state().meetings(), controller.now(), controller.renderer());
                    },
                    Command::Event(event) => {
                        let mut answer = Answer(false);
                        if let UiEvent::Action { action: Action::Delete, .. } = &event {
                            print!("{} [y/N] ", DELETE_CONFIRMATION);
                            std::io::stdout().flush()?;
                            let reply = match lines.next_line().await {
                                Ok(reply) => reply.unwrap_or_default(),
                                Err(err) => {
                                    log::warn!("Unable to read the answer: {}", err);
                                    String::new()
                                },
                            };
                            answer = Answer(is_yes(&reply));
                        }
                        report(dispatcher.dispatch(&mut controller, event, &mut answer));
                    },
                }
            },
        }
    }

    log::info!("Bye");
    Ok(())
}

/// Settings come from the file given as first argument, or from `meeting_alert.json` if it exists
fn load_settings() -> Result<Settings, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => Ok(Settings::from_file(Path::new(&path))?),
        None => {
            let default_path = Path::new(SETTINGS_FILE);
            if default_path.exists() {
                Ok(Settings::from_file(default_path)?)
            } else {
                log::info!("No {} file, using default settings", SETTINGS_FILE);
                Ok(Settings::default())
            }
        },
    }
}

fn open_store(settings: &Settings) -> MeetingStore {
    match FileStore::new(&settings.storage_folder) {
        Ok(store) => MeetingStore::new(Box::new(store), &settings.storage_key),
        Err(err) => {
            log::warn!("{}. Meetings will only be kept for this session", err);
            MeetingStore::new(Box::new(MemoryStore::new()), &settings.storage_key)
        },
    }
}

/// What a read from stdin amounts to
#[derive(Debug, PartialEq)]
enum Input {
    Line(String),
    /// Blank or unreadable (e.g. not UTF-8) lines
    Skip,
    End,
}

impl From<std::io::Result<Option<String>>> for Input {
    fn from(read: std::io::Result<Option<String>>) -> Self {
        match read {
            Ok(Some(line)) if line.trim().is_empty() => Input::Skip,
            Ok(Some(line)) => Input::Line(line),
            Ok(None) => Input::End,
            Err(err) => {
                log::warn!("Unable to read this line: {}", err);
                Input::Skip
            },
        }
    }
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Done => println!("ok"),
        Outcome::Ignored => println!("nothing to do"),
        Outcome::Rejected(failure) => println!("rejected: {}", failure),
    }
}
