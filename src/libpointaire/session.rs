use crate::libpointaire::lifeline::{DisplayEffect, LifelineKind, LifelineState};
use crate::libpointaire::question::{Letter, Question, QuestionBank};
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

pub const DEFAULT_QUESTION_COUNT: usize = 15;

/// The question currently in play.
#[derive(Debug, Clone, Copy)]
pub struct Turn<'q> {
    pub number: usize,
    pub total: usize,
    pub question: &'q Question,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Answer(Letter),
    Lifeline,
    /// "I don't know". Scores as incorrect.
    Pass,
    Quit,
}

/// Every point where a session waits on the player.
pub trait Prompter {
    /// `lifelines` is empty once all three are spent; the Lifeline choice
    /// should not be offered then.
    fn ask(&mut self, turn: Turn<'_>, lifelines: &[LifelineKind]) -> Selection;
    /// `None` is Cancel.
    fn pick_lifeline(&mut self, available: &[LifelineKind]) -> Option<LifelineKind>;
    fn reveal(&mut self, turn: Turn<'_>, effect: &DisplayEffect);
    /// Re-asks after a lifeline, offering all four options. `None` quits.
    fn final_answer(&mut self, turn: Turn<'_>, effect: &DisplayEffect) -> Option<Letter>;
    fn verdict(&mut self, turn: Turn<'_>, given: Option<Letter>, correct: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    NoQuestions,
    Completed { score: u32, asked: usize },
    Quit { score: u32, asked: usize },
}

impl SessionEnd {
    pub fn score(&self) -> u32 {
        match self {
            SessionEnd::NoQuestions => 0,
            SessionEnd::Completed { score, .. } | SessionEnd::Quit { score, .. } => *score,
        }
    }

    /// Questions answered before the session ended.
    pub fn asked(&self) -> usize {
        match self {
            SessionEnd::NoQuestions => 0,
            SessionEnd::Completed { asked, .. } | SessionEnd::Quit { asked, .. } => *asked,
        }
    }
}

enum Step {
    Answered(Option<Letter>),
    Quit,
}

pub struct Session<'b> {
    player: String,
    queue: Vec<&'b Question>,
    lifelines: LifelineState,
    correct: u32,
}

impl<'b> Session<'b> {
    /// Draws `min(question_count, bank.len())` distinct questions in random order.
    pub fn new<R: Rng + ?Sized>(
        bank: &'b QuestionBank,
        player: &str,
        question_count: usize,
        rng: &mut R,
    ) -> Self {
        let mut queue: Vec<&Question> = bank.questions().iter().collect();
        queue.shuffle(rng);
        queue.truncate(question_count);
        debug!(
            "[Session] Drew {} of {} questions for {:?}",
            queue.len(),
            bank.len(),
            player
        );

        Session {
            player: player.to_string(),
            queue,
            lifelines: LifelineState::default(),
            correct: 0,
        }
    }

    #[cfg(test)]
    pub fn questions(&self) -> &[&'b Question] {
        &self.queue
    }

    pub fn run<P: Prompter + ?Sized, R: Rng + ?Sized>(
        mut self,
        prompter: &mut P,
        rng: &mut R,
    ) -> SessionEnd {
        if self.queue.is_empty() {
            warn!("[Session] No questions available for {:?}", self.player);
            return SessionEnd::NoQuestions;
        }

        let queue = std::mem::take(&mut self.queue);
        let total = queue.len();
        for (idx, question) in queue.into_iter().enumerate() {
            let turn = Turn {
                number: idx + 1,
                total,
                question,
            };
            match self.play_turn(turn, prompter, rng) {
                Step::Answered(given) => {
                    let correct = given.is_some_and(|letter| question.is_correct(letter));
                    if correct {
                        self.correct += 1;
                    }
                    debug!("[Session] {}/{}: {:?} -> {}", turn.number, total, given, correct);
                    prompter.verdict(turn, given, correct);
                }
                Step::Quit => {
                    info!(
                        "[Session] {:?} quit after {} of {} questions with {}",
                        self.player, idx, total, self.correct
                    );
                    return SessionEnd::Quit {
                        score: self.correct,
                        asked: idx,
                    };
                }
            }
        }

        info!(
            "[Session] {:?} finished {} questions with {}",
            self.player, total, self.correct
        );
        SessionEnd::Completed {
            score: self.correct,
            asked: total,
        }
    }

    fn play_turn<P: Prompter + ?Sized, R: Rng + ?Sized>(
        &mut self,
        turn: Turn<'_>,
        prompter: &mut P,
        rng: &mut R,
    ) -> Step {
        let available = self.lifelines.available();
        match prompter.ask(turn, &available) {
            Selection::Answer(letter) => Step::Answered(Some(letter)),
            Selection::Pass => Step::Answered(None),
            Selection::Quit => Step::Quit,
            Selection::Lifeline => {
                let effect = match self.use_lifeline(turn, &available, prompter, rng) {
                    Some(effect) => effect,
                    // cancelled: "Lifeline" stays the answer
                    None => return Step::Answered(None),
                };
                match prompter.final_answer(turn, &effect) {
                    Some(letter) => Step::Answered(Some(letter)),
                    None => Step::Quit,
                }
            }
        }
    }

    fn use_lifeline<P: Prompter + ?Sized, R: Rng + ?Sized>(
        &mut self,
        turn: Turn<'_>,
        available: &[LifelineKind],
        prompter: &mut P,
        rng: &mut R,
    ) -> Option<DisplayEffect> {
        if available.is_empty() {
            warn!("[Session] Lifeline chosen but none are left");
            return None;
        }
        let kind = prompter.pick_lifeline(available)?;
        if !self.lifelines.consume(kind) {
            warn!("[Session] {} was already used; treating as cancel", kind);
            return None;
        }
        let effect = kind.apply(turn.question, rng);
        prompter.reveal(turn, &effect);
        Some(effect)
    }
}

pub fn run_session<P: Prompter + ?Sized, R: Rng + ?Sized>(
    bank: &QuestionBank,
    player: &str,
    question_count: usize,
    prompter: &mut P,
    rng: &mut R,
) -> SessionEnd {
    Session::new(bank, player, question_count, rng).run(prompter, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libpointaire::question::sample_question;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashSet, VecDeque};

    /// Plays back canned replies and records what it was shown.
    #[derive(Default)]
    struct Script {
        selections: VecDeque<Selection>,
        lifelines: VecDeque<Option<LifelineKind>>,
        finals: VecDeque<Option<Letter>>,
        asked: Vec<String>,
        offered: Vec<Vec<LifelineKind>>,
        menus: Vec<Vec<LifelineKind>>,
        effects: Vec<DisplayEffect>,
        verdicts: Vec<(Option<Letter>, bool)>,
        calls: usize,
    }

    impl Script {
        fn answering(selections: impl IntoIterator<Item = Selection>) -> Self {
            Script {
                selections: selections.into_iter().collect(),
                ..Default::default()
            }
        }
    }

    impl Prompter for Script {
        fn ask(&mut self, turn: Turn<'_>, lifelines: &[LifelineKind]) -> Selection {
            self.calls += 1;
            self.asked.push(turn.question.prompt().to_string());
            self.offered.push(lifelines.to_vec());
            self.selections.pop_front().unwrap_or(Selection::Pass)
        }
        fn pick_lifeline(&mut self, available: &[LifelineKind]) -> Option<LifelineKind> {
            self.calls += 1;
            self.menus.push(available.to_vec());
            self.lifelines.pop_front().flatten()
        }
        fn reveal(&mut self, _turn: Turn<'_>, effect: &DisplayEffect) {
            self.calls += 1;
            self.effects.push(effect.clone());
        }
        fn final_answer(&mut self, _turn: Turn<'_>, _effect: &DisplayEffect) -> Option<Letter> {
            self.calls += 1;
            self.finals.pop_front().flatten()
        }
        fn verdict(&mut self, _turn: Turn<'_>, given: Option<Letter>, correct: bool) {
            self.calls += 1;
            self.verdicts.push((given, correct));
        }
    }

    fn bank_of(n: usize) -> QuestionBank {
        QuestionBank::new(
            (0..n)
                .map(|i| {
                    Question::new(
                        format!("Question {i}"),
                        vec!["w".into(), "x".into(), "y".into(), "z".into()],
                        "C",
                    )
                    .unwrap()
                })
                .collect(),
        )
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(2024)
    }

    #[test]
    fn test_empty_bank_prompts_nothing() {
        let mut script = Script::default();
        let end = run_session(&QuestionBank::default(), "Ann", 15, &mut script, &mut rng());
        assert_eq!(end, SessionEnd::NoQuestions);
        assert_eq!(end.score(), 0);
        assert_eq!(script.calls, 0);
    }

    #[test]
    fn test_single_question_right_and_wrong() {
        let bank = QuestionBank::new(vec![sample_question()]);

        let mut script = Script::answering([Selection::Answer(Letter::B)]);
        let end = run_session(&bank, "Ann", 15, &mut script, &mut rng());
        assert_eq!(end, SessionEnd::Completed { score: 1, asked: 1 });
        assert_eq!(script.verdicts, vec![(Some(Letter::B), true)]);

        let mut script = Script::answering([Selection::Answer(Letter::A)]);
        let end = run_session(&bank, "Ann", 15, &mut script, &mut rng());
        assert_eq!(end, SessionEnd::Completed { score: 0, asked: 1 });
        assert_eq!(script.verdicts, vec![(Some(Letter::A), false)]);
    }

    #[test]
    fn test_small_bank_asks_each_question_once() {
        let bank = bank_of(9);
        let mut script = Script::default();
        let end = run_session(&bank, "Ann", 15, &mut script, &mut rng());
        assert_eq!(end, SessionEnd::Completed { score: 0, asked: 9 });
        assert_eq!(script.asked.len(), 9);
        let distinct: HashSet<_> = script.asked.iter().collect();
        assert_eq!(distinct.len(), 9);
    }

    #[test]
    fn test_large_bank_is_capped() {
        let bank = bank_of(40);
        let session = Session::new(&bank, "Ann", DEFAULT_QUESTION_COUNT, &mut rng());
        assert_eq!(session.questions().len(), 15);
        let distinct: HashSet<_> = session
            .questions()
            .iter()
            .map(|q| q.prompt().to_string())
            .collect();
        assert_eq!(distinct.len(), 15);
    }

    #[test]
    fn test_all_correct_scores_every_question() {
        let bank = bank_of(5);
        let mut script = Script::answering([Selection::Answer(Letter::C); 5]);
        let end = run_session(&bank, "Ann", 15, &mut script, &mut rng());
        assert_eq!(end.score(), 5);
    }

    #[test]
    fn test_lifeline_then_final_answer() {
        let bank = QuestionBank::new(vec![sample_question()]);
        let mut script = Script::answering([Selection::Lifeline]);
        script.lifelines.push_back(Some(LifelineKind::FiftyFifty));
        script.finals.push_back(Some(Letter::B));

        let end = run_session(&bank, "Ann", 15, &mut script, &mut rng());
        assert_eq!(end.score(), 1);
        assert_eq!(script.effects.len(), 1);
        match &script.effects[0] {
            DisplayEffect::FiftyFifty { remaining } => assert!(remaining.contains(&Letter::B)),
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn test_lifeline_not_offered_twice() {
        let bank = bank_of(3);
        let mut script = Script::answering([Selection::Lifeline, Selection::Lifeline]);
        script.lifelines.push_back(Some(LifelineKind::FiftyFifty));
        script.lifelines.push_back(None);
        script.finals.push_back(Some(Letter::C));

        run_session(&bank, "Ann", 15, &mut script, &mut rng());
        assert_eq!(script.menus.len(), 2);
        assert_eq!(script.menus[0], LifelineKind::ALL.to_vec());
        assert!(!script.menus[1].contains(&LifelineKind::FiftyFifty));
        assert!(!script.offered[2].contains(&LifelineKind::FiftyFifty));
    }

    #[test]
    fn test_cancel_consumes_nothing_and_forfeits_question() {
        let bank = QuestionBank::new(vec![sample_question()]);
        let mut script = Script::answering([Selection::Lifeline]);
        script.lifelines.push_back(None);

        let end = run_session(&bank, "Ann", 15, &mut script, &mut rng());
        assert_eq!(end, SessionEnd::Completed { score: 0, asked: 1 });
        assert_eq!(script.asked.len(), 1);
        assert!(script.effects.is_empty());
        assert_eq!(script.verdicts, vec![(None, false)]);
    }

    #[test]
    fn test_cancel_keeps_lifelines_for_later() {
        let bank = bank_of(2);
        let mut script = Script::answering([Selection::Lifeline, Selection::Lifeline]);
        script.lifelines.push_back(None);
        script.lifelines.push_back(Some(LifelineKind::CallFriend));
        script.finals.push_back(Some(Letter::C));

        let end = run_session(&bank, "Ann", 15, &mut script, &mut rng());
        assert_eq!(script.menus[1], LifelineKind::ALL.to_vec());
        assert_eq!(end.score(), 1);
    }

    #[test]
    fn test_reused_lifeline_is_treated_as_cancel() {
        let bank = bank_of(2);
        let mut script = Script::answering([Selection::Lifeline, Selection::Lifeline]);
        script.lifelines.push_back(Some(LifelineKind::AudiencePoll));
        script.lifelines.push_back(Some(LifelineKind::AudiencePoll));
        script.finals.push_back(Some(Letter::C));
        script.finals.push_back(Some(Letter::C));

        let end = run_session(&bank, "Ann", 15, &mut script, &mut rng());
        assert_eq!(script.effects.len(), 1);
        assert_eq!(end.score(), 1);
    }

    #[test]
    fn test_exhausted_lifelines_are_not_offered() {
        let bank = bank_of(4);
        let mut script = Script::answering([Selection::Lifeline; 3]);
        for kind in LifelineKind::ALL {
            script.lifelines.push_back(Some(kind));
            script.finals.push_back(Some(Letter::C));
        }

        let end = run_session(&bank, "Ann", 15, &mut script, &mut rng());
        assert_eq!(end.score(), 3);
        assert!(script.offered[3].is_empty());
    }

    #[test]
    fn test_quit_keeps_score_so_far() {
        let bank = bank_of(6);
        let mut script = Script::answering([
            Selection::Answer(Letter::C),
            Selection::Answer(Letter::C),
            Selection::Quit,
        ]);
        let end = run_session(&bank, "Ann", 15, &mut script, &mut rng());
        assert_eq!(end, SessionEnd::Quit { score: 2, asked: 2 });
        assert_eq!(end.asked(), 2);
        assert_eq!(script.asked.len(), 3);
    }

    #[test]
    fn test_quit_at_final_answer() {
        let bank = bank_of(2);
        let mut script = Script::answering([Selection::Lifeline]);
        script.lifelines.push_back(Some(LifelineKind::CallFriend));
        script.finals.push_back(None);

        let end = run_session(&bank, "Ann", 15, &mut script, &mut rng());
        assert_eq!(end, SessionEnd::Quit { score: 0, asked: 0 });
    }

    #[test]
    fn test_sessions_do_not_share_lifelines() {
        let bank = bank_of(1);
        for _ in 0..2 {
            let mut script = Script::answering([Selection::Lifeline]);
            script.lifelines.push_back(Some(LifelineKind::FiftyFifty));
            script.finals.push_back(Some(Letter::C));
            run_session(&bank, "Ann", 15, &mut script, &mut rng());
            assert_eq!(script.menus[0], LifelineKind::ALL.to_vec());
        }
    }
}
