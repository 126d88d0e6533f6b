use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use weathernow_core::{AppStore, Config, StoreEvent};

use crate::render;

const HELP: &str = "\
Commands:
  <city>      search for a city, e.g. London or London, GB
  ?<text>     show suggestions for partial text
  :<n>        pick suggestion n
  :here       use the current location
  :units      toggle metric / imperial
  :theme      toggle light / dark
  :help       show this help
  :quit       exit";

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
enum Input {
    Search(String),
    Type(String),
    Pick(usize),
    Here,
    Units,
    Theme,
    Help,
    Quit,
    Nothing,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Input::Nothing;
        }
        if let Some(text) = line.strip_prefix('?') {
            return Input::Type(text.to_string());
        }
        let Some(command) = line.strip_prefix(':') else {
            return Input::Search(line.to_string());
        };

        match command.trim().to_lowercase().as_str() {
            "here" => Input::Here,
            "units" | "u" => Input::Units,
            "theme" | "t" => Input::Theme,
            "help" | "h" => Input::Help,
            "quit" | "q" | "exit" => Input::Quit,
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 => Input::Pick(n - 1),
                _ => Input::Unknown(line.to_string()),
            },
        }
    }
}

pub async fn run(config: &Config) -> anyhow::Result<()> {
    let mut store = AppStore::from_config(config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}\n");
    store.init();
    print!("{}", render::report(store.state()));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };
                if !handle(&mut store, Input::parse(&line)) {
                    break;
                }
            }
            Some(event) = store.next_event() => match event {
                StoreEvent::Located { .. } => store.apply(event),
                StoreEvent::Suggestions(_) => {
                    store.apply(event);
                    print_suggestions(&store);
                }
                StoreEvent::Weather(_) => {
                    store.apply(event);
                    println!("{}", render::status(store.state()));
                    print!("{}", render::report(store.state()));
                }
            },
        }
    }

    Ok(())
}

/// Returns `false` when the session should end.
fn handle(store: &mut AppStore, input: Input) -> bool {
    tracing::debug!(?input, "input");
    match input {
        Input::Search(text) => {
            store.search(&text);
            print!("{}", render::report(store.state()));
        }
        Input::Type(text) => {
            store.update_search_input(&text);
            if !store.state().suggestion_status.is_loading() {
                println!("(suggestions cleared)");
            }
        }
        Input::Pick(index) => {
            if store.select_suggestion_at(index) {
                print!("{}", render::report(store.state()));
            } else {
                println!("No suggestion {}", index + 1);
            }
        }
        Input::Here => {
            store.use_current_location();
            print!("{}", render::report(store.state()));
        }
        Input::Units => {
            store.toggle_units();
            println!("{}", render::status(store.state()));
        }
        Input::Theme => {
            store.toggle_theme();
            println!("{}", render::status(store.state()));
        }
        Input::Help => println!("{HELP}"),
        Input::Quit => return false,
        Input::Nothing => {}
        Input::Unknown(line) => println!("Unknown command `{line}`, try :help"),
    }
    true
}

fn print_suggestions(store: &AppStore) {
    let state = store.state();
    if let Some(msg) = state.suggestion_status.error_message() {
        println!("No suggestions ({msg})");
    } else if state.suggestions.is_empty() {
        println!("No suggestions");
    } else {
        print!("{}", render::suggestions(state));
    }
}
