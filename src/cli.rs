use crate::libpointaire::leaderboard::Leaderboard;
use crate::libpointaire::lifeline::{DisplayEffect, LifelineKind};
use crate::libpointaire::question::{Letter, Question};
use crate::libpointaire::session::{Prompter, Selection, Turn};
use colored::Colorize;
use log::{debug, info, warn};
use std::io::{self, Read, Write};
use text_io::try_read;

const RULE: &str = "====================";

pub(crate) fn banner(title: &str) {
    println!("{}", format!("==========> {} <==========", title).cyan().bold());
}

/// Reads one trimmed line from `bytes`. `None` once the input is exhausted.
pub(crate) fn read_line_from<I: Iterator<Item = u8>>(bytes: I) -> Option<String> {
    let mut bytes = bytes.peekable();
    bytes.peek()?;
    let line: Result<String, _> = try_read!("{}\n", bytes);
    match line {
        Ok(line) => Some(line.trim().to_string()),
        Err(err) => {
            debug!("[Input] Unreadable line: {}", err);
            None
        }
    }
}

/// Prints `label` and reads one trimmed line. `None` means stdin is closed.
pub(crate) fn prompt(label: &str) -> Option<String> {
    print!("{} ", label.cyan());
    if let Err(err) = io::stdout().flush() {
        warn!("[Input] Cannot flush stdout: {}", err);
    }
    let line = read_line_from(io::stdin().lock().bytes().map_while(Result::ok));
    if line.is_none() {
        println!();
        info!("[Input] End of input");
    }
    line
}

/// Maps a yes/no answer. End of input answers no.
pub(crate) fn parse_confirm(input: Option<&str>, default: bool) -> Option<bool> {
    let Some(input) = input else {
        return Some(false);
    };
    match input.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" => Some(true),
        "n" | "no" => Some(false),
        _ => None,
    }
}

pub(crate) fn confirm(label: &str, default: bool) -> bool {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    loop {
        match parse_confirm(prompt(&format!("{} {}", label, hint)).as_deref(), default) {
            Some(answer) => return answer,
            None => println!("{}", "Please answer y or n.".bright_red()),
        }
    }
}

/// Maps final-answer input: `Some(None)` quits, as does end of input.
pub(crate) fn parse_final_answer(input: Option<&str>) -> Option<Option<Letter>> {
    let Some(input) = input else {
        return Some(None);
    };
    if input.trim().eq_ignore_ascii_case("q") {
        return Some(None);
    }
    input.parse::<Letter>().ok().map(Some)
}

/// Reads a 1-based position from a list of `len` items.
pub(crate) fn parse_position(input: &str, len: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(num) if (1..=len).contains(&num) => Some(num - 1),
        _ => None,
    }
}

/// Maps answer-prompt input. `None` means the input should be asked again.
/// End of input quits.
pub(crate) fn parse_selection(input: Option<&str>, lifelines_offered: bool) -> Option<Selection> {
    let Some(input) = input else {
        return Some(Selection::Quit);
    };
    match input.trim().to_lowercase().as_str() {
        "q" => Some(Selection::Quit),
        "l" if lifelines_offered => Some(Selection::Lifeline),
        "l" => {
            println!("{}", "No lifelines left!".bright_red());
            None
        }
        input => match input.parse::<Letter>() {
            Ok(letter) => Some(Selection::Answer(letter)),
            Err(_) => Some(Selection::Pass),
        },
    }
}

/// Maps lifeline-menu input: `Some(None)` is Cancel, as is end of input.
pub(crate) fn parse_lifeline(
    input: Option<&str>,
    available: &[LifelineKind],
) -> Option<Option<LifelineKind>> {
    let Some(input) = input else {
        return Some(None);
    };
    if input.trim().eq_ignore_ascii_case("c") {
        return Some(None);
    }
    parse_position(input, available.len()).map(|idx| Some(available[idx]))
}

pub(crate) struct TerminalPrompter;

impl TerminalPrompter {
    fn print_question(&self, turn: Turn<'_>, struck: &[Letter]) -> usize {
        let leading = format!("{}/{}. ", turn.number, turn.total);
        println!(
            "{}{}",
            leading.cyan(),
            turn.question.prompt().black().bold().on_white()
        );
        let indent = " ".repeat(leading.len());
        for letter in Letter::ALL {
            let text = turn.question.option(letter);
            if struck.contains(&letter) {
                println!("{}{}. {}", indent, letter, text.dimmed().strikethrough());
            } else {
                println!("{}{}. {}", indent, format!("{}", letter).bold(), text);
            }
        }
        leading.len()
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, turn: Turn<'_>, lifelines: &[LifelineKind]) -> Selection {
        let indent = self.print_question(turn, &[]);
        let offered = !lifelines.is_empty();
        if offered {
            println!("{}{}. Lifeline", " ".repeat(indent), "L".bold());
        }
        let label = if offered {
            "Answer (A-D, L for a lifeline, q to quit prematurely and anything else if you don't know):"
        } else {
            "Answer (A-D, q to quit prematurely and anything else if you don't know):"
        };
        loop {
            if let Some(selection) = parse_selection(prompt(label).as_deref(), offered) {
                debug!("[Input] selection: {:?}", selection);
                return selection;
            }
        }
    }

    fn pick_lifeline(&mut self, available: &[LifelineKind]) -> Option<LifelineKind> {
        println!("{}\n{}\n{}", RULE, "Select a lifeline:".cyan(), RULE);
        for (i, kind) in available.iter().enumerate() {
            println!("  {}. {}", format!("{}", i + 1).bold(), kind);
        }
        println!("  {}. Cancel", "c".bold());
        loop {
            match parse_lifeline(prompt("Lifeline:").as_deref(), available) {
                Some(choice) => return choice,
                None => println!("{}", "Pick one of the listed lifelines or c.".bright_red()),
            }
        }
    }

    fn reveal(&mut self, turn: Turn<'_>, effect: &DisplayEffect) {
        let question = turn.question;
        match effect {
            DisplayEffect::FiftyFifty { remaining } => {
                println!("{}", "The 50/50 Lifeline has been activated.".blue());
                println!("Two of the four answers have been removed. Choose wisely.");
                for letter in remaining {
                    println!("{}", format!("{}: {}", letter, question.option(*letter)).blue());
                }
            }
            DisplayEffect::AudiencePoll { percentages } => {
                println!("{}", "The Audience Poll Lifeline has been activated.".blue());
                for (letter, share) in Letter::ALL.iter().zip(percentages) {
                    println!("{}", format!("{}: {}%", letter, share).blue());
                }
            }
            DisplayEffect::CallFriend { guess } => {
                println!("{}", "Call a Friend Lifeline has been used.".blue());
                println!(
                    "{}",
                    format!(
                        "Your friend wasn't 100% sure but thinks the answer could be: {}",
                        question.option(*guess)
                    )
                    .green()
                );
            }
        }
    }

    fn final_answer(&mut self, turn: Turn<'_>, effect: &DisplayEffect) -> Option<Letter> {
        let struck: Vec<Letter> = match effect {
            DisplayEffect::FiftyFifty { remaining } => Letter::ALL
                .into_iter()
                .filter(|letter| !remaining.contains(letter))
                .collect(),
            _ => Vec::new(),
        };
        self.print_question(turn, &struck);
        loop {
            let input = prompt("Final answer (A-D, q to quit prematurely):");
            match parse_final_answer(input.as_deref()) {
                Some(answer) => return answer,
                None => println!("{}", "Please answer A, B, C or D.".bright_red()),
            }
        }
    }

    fn verdict(&mut self, turn: Turn<'_>, given: Option<Letter>, correct: bool) {
        if correct {
            println!("{}", "Congrats, you got the answer right!".bright_green());
            return;
        }
        if given.is_none() {
            println!("{}", "No answer given.".bright_red());
        }
        println!(
            "{}",
            format!(
                "Close...but not close enough. The correct answer was: {}",
                turn.question.correct_text()
            )
            .bright_red()
        );
    }
}

pub(crate) fn show_questions(questions: &[Question]) {
    if questions.is_empty() {
        println!("{}", "No questions available.".yellow());
        return;
    }
    for (idx, question) in questions.iter().enumerate() {
        println!("{}", format!("Question {}: {}", idx + 1, question.prompt()).yellow());
        for letter in Letter::ALL {
            println!("{}", format!("    {}: {}", letter, question.option(letter)).blue());
        }
        println!("{}", format!("    Correct Answer: {}", question.correct()).green());
    }
}

pub(crate) fn show_leaderboard(board: &Leaderboard) {
    if board.is_empty() {
        println!("{}", "No scores available. Play the game to earn some!".red());
        return;
    }
    banner("Leader Board");
    for (idx, entry) in board.top().iter().enumerate() {
        println!("{}", format!("{}. {}: {}", idx + 1, entry.name, entry.score).bright_blue());
    }
}
