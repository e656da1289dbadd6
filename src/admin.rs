use crate::cli::{confirm, parse_position, prompt, show_leaderboard, show_questions};
use crate::libpointaire::leaderboard::Leaderboard;
use crate::libpointaire::question::{parse_options, Question, QuestionBank, QuestionError};
use crate::libpointaire::store;
use colored::Colorize;
use log::{debug, info};
use std::path::Path;

const RULE: &str = "====================";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminAction {
    Add,
    Delete,
    Edit,
    View,
    Leaderboard,
    MainMenu,
}

impl AdminAction {
    const MENU: [(AdminAction, &'static str); 6] = [
        (AdminAction::Add, "Add question"),
        (AdminAction::Delete, "Delete question"),
        (AdminAction::Edit, "Edit question"),
        (AdminAction::View, "View questions"),
        (AdminAction::Leaderboard, "View Leader Board"),
        (AdminAction::MainMenu, "Main Menu"),
    ];

    /// End of input returns to the main menu.
    fn from_input(input: Option<&str>) -> Option<AdminAction> {
        let Some(input) = input else {
            return Some(AdminAction::MainMenu);
        };
        parse_position(input, Self::MENU.len()).map(|idx| Self::MENU[idx].0)
    }
}

/// Builds an edited question. Empty inputs keep the current value.
fn edited_question(
    current: &Question,
    prompt_input: &str,
    options_input: &str,
    correct_input: &str,
) -> Result<Question, QuestionError> {
    let prompt_text = if prompt_input.is_empty() {
        current.prompt().to_string()
    } else {
        prompt_input.to_string()
    };
    let options = if options_input.is_empty() {
        current.options().to_vec()
    } else {
        parse_options(options_input)?
    };
    let correct = if correct_input.is_empty() {
        current.correct().to_string()
    } else {
        correct_input.to_string()
    };
    Question::new(prompt_text, options, &correct)
}

fn new_question(
    prompt_input: &str,
    options_input: &str,
    correct_input: &str,
) -> Result<Question, QuestionError> {
    Question::new(prompt_input, parse_options(options_input)?, correct_input)
}

fn persist(path: &Path, bank: &QuestionBank, done: &str) {
    match store::save_question_bank(path, bank) {
        Ok(_) => println!("{}", done.green()),
        Err(err) => println!(
            "{}",
            format!("Failed to save questions ({}). Your change is kept for now.", err).red()
        ),
    }
}

fn pick_question(bank: &QuestionBank, verb: &str) -> Option<usize> {
    if bank.is_empty() {
        println!("{}", "No questions available.".yellow());
        return None;
    }
    println!("{}\n{}\n{}", RULE, format!("Select a question to {}:", verb).cyan(), RULE);
    for (idx, question) in bank.questions().iter().enumerate() {
        println!("  {}. {}", format!("{}", idx + 1).bold(), question.prompt());
    }
    let picked = parse_position(&prompt("Question number:")?, bank.len());
    if picked.is_none() {
        println!("{}", "Error: Question not found.".red());
    }
    picked
}

/// Reads the three question fields. `None` once stdin is closed.
fn read_fields(labels: [&str; 3]) -> Option<[String; 3]> {
    let [prompt_label, options_label, correct_label] = labels;
    Some([prompt(prompt_label)?, prompt(options_label)?, prompt(correct_label)?])
}

fn add_question(bank: &mut QuestionBank, path: &Path) {
    let Some([prompt_input, options_input, correct_input]) = read_fields([
        "Enter your question:",
        "Enter the options (separate by commas):",
        "Enter the correct option (A, B, C, D):",
    ]) else {
        return;
    };
    match new_question(&prompt_input, &options_input, &correct_input) {
        Ok(question) => {
            info!("[Admin] Adding question {:?}", question.prompt());
            bank.add(question);
            persist(path, bank, "Question added successfully!");
        }
        Err(err) => println!("{}", format!("{}", err).red()),
    }
}

fn delete_question(bank: &mut QuestionBank, path: &Path) {
    let Some(idx) = pick_question(bank, "delete") else {
        return;
    };
    match bank.remove(idx) {
        Ok(removed) => {
            info!("[Admin] Deleted question {:?}", removed.prompt());
            persist(path, bank, "Question deleted successfully!");
        }
        Err(err) => println!("{}", format!("{}", err).red()),
    }
}

fn edit_question(bank: &mut QuestionBank, path: &Path) {
    let Some(idx) = pick_question(bank, "edit") else {
        return;
    };
    let current = bank.questions()[idx].clone();
    let Some([prompt_input, options_input, correct_input]) = read_fields([
        &format!("Enter the new question [{}]:", current.prompt()),
        &format!(
            "Enter the new options (separated by commas) [{}]:",
            current.options().join(", ")
        ),
        &format!(
            "Enter the correct option letter (A, B, C, D) [{}]:",
            current.correct()
        ),
    ]) else {
        return;
    };

    let edited = match edited_question(&current, &prompt_input, &options_input, &correct_input) {
        Ok(edited) => edited,
        Err(err) => {
            println!("{}", format!("{}", err).red());
            return;
        }
    };
    match bank.replace(idx, edited) {
        Ok(_) => {
            info!("[Admin] Edited question {}", idx + 1);
            persist(path, bank, "Question edited successfully!");
        }
        Err(err) => println!("{}", format!("{}", err).red()),
    }
}

pub(crate) fn admin_menu(bank: &mut QuestionBank, questions_path: &Path, board: &Leaderboard) {
    loop {
        println!("{}", "Admin Menu:".cyan().bold());
        for (i, (_, label)) in AdminAction::MENU.iter().enumerate() {
            println!("  {}. {}", format!("{}", i + 1).bold(), label.blue());
        }
        let action = match AdminAction::from_input(prompt("Option:").as_deref()) {
            Some(action) => action,
            None => {
                println!("{}", "Pick one of the listed options.".bright_red());
                continue;
            }
        };
        debug!("[Admin] action: {:?}", action);

        match action {
            AdminAction::Add => add_question(bank, questions_path),
            AdminAction::Delete => delete_question(bank, questions_path),
            AdminAction::Edit => edit_question(bank, questions_path),
            AdminAction::View => show_questions(bank.questions()),
            AdminAction::Leaderboard => show_leaderboard(board),
            AdminAction::MainMenu => return,
        }

        if !confirm("Do you want to perform another action in the admin menu?", true) {
            return;
        }
    }
}
