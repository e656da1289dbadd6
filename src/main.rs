use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use log::{debug, error, info};
use std::path::PathBuf;

mod admin;
mod cli;
mod libpointaire;

use crate::cli::{banner, confirm, parse_position, prompt, show_leaderboard, TerminalPrompter};
use crate::libpointaire::leaderboard::{Leaderboard, ScoreEntry};
use crate::libpointaire::question::QuestionBank;
use crate::libpointaire::session::{run_session, SessionEnd, DEFAULT_QUESTION_COUNT};
use crate::libpointaire::store;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum MenuChoice {
    Play,
    Admin,
    Leaderboard,
    Exit,
}

/// What the shell does after a finished game.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Continuation {
    PlayAgain,
    ReturnToMenu,
    Exit,
}

#[derive(Parser, Debug)]
#[command(name = "Who Wants to Be a Pointaire?")]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(long, value_name = "FILE", default_value = "questions.json")]
    questions: PathBuf,
    #[arg(long, value_name = "FILE", default_value = "scores.json")]
    scores: PathBuf,
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_QUESTION_COUNT,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    question_count: usize,
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

impl MenuChoice {
    const MENU: [(MenuChoice, &'static str); 4] = [
        (MenuChoice::Play, "Play the game"),
        (MenuChoice::Admin, "Admin"),
        (MenuChoice::Leaderboard, "View Leader Board"),
        (MenuChoice::Exit, "Exit"),
    ];

    /// End of input exits.
    fn from_input(input: Option<&str>) -> Option<MenuChoice> {
        let Some(input) = input else {
            return Some(MenuChoice::Exit);
        };
        parse_position(input, Self::MENU.len()).map(|idx| Self::MENU[idx].0)
    }
}

impl Continuation {
    /// End of input exits.
    fn from_input(input: Option<&str>) -> Option<Continuation> {
        let Some(input) = input else {
            return Some(Continuation::Exit);
        };
        match input.trim().to_lowercase().as_str() {
            "p" | "y" | "yes" => Some(Continuation::PlayAgain),
            "m" => Some(Continuation::ReturnToMenu),
            "q" | "n" | "no" => Some(Continuation::Exit),
            _ => None,
        }
    }
}

fn main_menu() -> MenuChoice {
    banner("Who Wants to Be a Pointaire?");
    loop {
        println!("{}", "Select an option:".cyan());
        for (i, (_, label)) in MenuChoice::MENU.iter().enumerate() {
            println!("  {}. {}", format!("{}", i + 1).bold(), label.blue());
        }
        match MenuChoice::from_input(prompt("Option:").as_deref()) {
            Some(choice) => return choice,
            None => println!("{}", "Pick one of the listed options.".bright_red()),
        }
    }
}

/// `None` once stdin is closed.
fn read_player_name() -> Option<String> {
    loop {
        let name = prompt("Please enter your name:")?;
        if !name.is_empty() {
            return Some(name);
        }
    }
}

fn record_score(board: &mut Leaderboard, scores_path: &std::path::Path, entry: ScoreEntry) {
    let (name, score) = (entry.name.clone(), entry.score);
    *board = board.merge(entry);
    match store::save_leaderboard(scores_path, board) {
        Ok(_) => println!(
            "{}",
            format!(
                "Your score has been added to our leaderboard: {} score {}",
                name, score
            )
            .yellow()
        ),
        Err(err) => {
            error!("[Setup] Failed to save scores: {}", err);
            println!(
                "{}",
                format!("Failed to save scores ({}). They will be saved with the next recorded game.", err)
                    .red()
            )
        }
    }
}

fn play(args: &Args, bank: &QuestionBank, board: &mut Leaderboard) -> Continuation {
    let Some(player) = read_player_name() else {
        return Continuation::Exit;
    };
    let mut prompter = TerminalPrompter;
    let mut rng = rand::rng();

    loop {
        let end = run_session(bank, &player, args.question_count, &mut prompter, &mut rng);
        debug!("[Setup] Session ended: {:?}", end);
        match end {
            SessionEnd::NoQuestions => {
                println!(
                    "{}",
                    "No questions available. Ask an admin to add some!".yellow()
                );
                return Continuation::ReturnToMenu;
            }
            SessionEnd::Quit { .. } => println!("{}", "Quitting Early!".cyan()),
            SessionEnd::Completed { .. } => {}
        }

        let score = end.score();
        println!(
            "{}",
            format!(
                "Congrats {}, you got {} out of {} questions correct",
                player,
                score,
                end.asked()
            )
            .yellow()
        );
        if confirm("Do you want your score recorded?", true) {
            record_score(board, &args.scores, ScoreEntry::new(player.clone(), score));
        } else {
            println!("{}", "Your score was not recorded.".yellow());
        }

        let next = loop {
            let input = prompt(
                "Clarkson has challenged you to another game. [p]lay again, back to the [m]enu or [q]uit?",
            );
            if let Some(next) = Continuation::from_input(input.as_deref()) {
                break next;
            }
        };
        if next != Continuation::PlayAgain {
            return next;
        }
    }
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str())).init();

    let mut board = store::load_leaderboard(&args.scores);
    let mut bank = store::load_question_bank(&args.questions);
    info!(
        "[Setup] {} questions and {} scores loaded",
        bank.len(),
        board.entries().len()
    );

    loop {
        let choice = main_menu();
        debug!("[Setup] menu choice: {:?}", choice);
        match choice {
            MenuChoice::Play => {
                if play(&args, &bank, &mut board) == Continuation::Exit {
                    break;
                }
            }
            MenuChoice::Admin => admin::admin_menu(&mut bank, &args.questions, &board),
            MenuChoice::Leaderboard => show_leaderboard(&board),
            MenuChoice::Exit => break,
        }
    }
    println!("{}", "We thank you for playing!".yellow());
}
