use crate::libpointaire::question::{Letter, Question, OPTION_COUNT};
use log::debug;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use std::fmt;

const AUDIENCE_ACCURACY: f64 = 0.9;
const CONFIDENT_SHARE: u8 = 90;
const CONFIDENT_RESIDUAL: [u8; 3] = [5, 3, 2];
const CONFUSED_CEILING: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifelineKind {
    FiftyFifty,
    AudiencePoll,
    CallFriend,
}

impl LifelineKind {
    /// Menu order.
    pub const ALL: [LifelineKind; 3] = [
        LifelineKind::FiftyFifty,
        LifelineKind::AudiencePoll,
        LifelineKind::CallFriend,
    ];

    /// Reveals information about `question` without touching it.
    pub fn apply<R: Rng + ?Sized>(self, question: &Question, rng: &mut R) -> DisplayEffect {
        let effect = match self {
            LifelineKind::FiftyFifty => fifty_fifty(question, rng),
            LifelineKind::AudiencePoll => audience_poll(question, rng),
            LifelineKind::CallFriend => call_friend(rng),
        };
        debug!("[Lifeline] {} -> {:?}", self, effect);
        effect
    }
}

impl fmt::Display for LifelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LifelineKind::FiftyFifty => "50/50",
            LifelineKind::AudiencePoll => "Audience Poll",
            LifelineKind::CallFriend => "Call a Friend",
        })
    }
}

/// Which lifelines have been spent. Lives for exactly one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifelineState {
    fifty_fifty_used: bool,
    audience_poll_used: bool,
    call_friend_used: bool,
}

impl LifelineState {
    fn flag(&mut self, kind: LifelineKind) -> &mut bool {
        match kind {
            LifelineKind::FiftyFifty => &mut self.fifty_fifty_used,
            LifelineKind::AudiencePoll => &mut self.audience_poll_used,
            LifelineKind::CallFriend => &mut self.call_friend_used,
        }
    }

    pub fn is_used(&self, kind: LifelineKind) -> bool {
        match kind {
            LifelineKind::FiftyFifty => self.fifty_fifty_used,
            LifelineKind::AudiencePoll => self.audience_poll_used,
            LifelineKind::CallFriend => self.call_friend_used,
        }
    }

    pub fn available(&self) -> Vec<LifelineKind> {
        LifelineKind::ALL
            .into_iter()
            .filter(|kind| !self.is_used(*kind))
            .collect()
    }

    /// Marks `kind` as spent. Returns false, changing nothing, if it already was.
    pub fn consume(&mut self, kind: LifelineKind) -> bool {
        let flag = self.flag(kind);
        if *flag {
            return false;
        }
        *flag = true;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEffect {
    /// The correct option and one other, ascending.
    FiftyFifty { remaining: [Letter; 2] },
    /// Vote share per option position; always sums to 100.
    AudiencePoll { percentages: [u8; OPTION_COUNT] },
    CallFriend { guess: Letter },
}

fn fifty_fifty<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> DisplayEffect {
    let correct = question.correct();
    let others: Vec<Letter> = Letter::ALL
        .into_iter()
        .filter(|letter| *letter != correct)
        .collect();
    // `others` always holds three letters
    let other = *others.choose(rng).unwrap_or(&others[0]);

    let mut remaining = [correct, other];
    remaining.sort();
    DisplayEffect::FiftyFifty { remaining }
}

fn audience_poll<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> DisplayEffect {
    let (main, residual) = if rng.random_bool(AUDIENCE_ACCURACY) {
        (CONFIDENT_SHARE, CONFIDENT_RESIDUAL)
    } else {
        let main = rng.random_range(0..CONFUSED_CEILING);
        let rest = 100 - main;
        let first = rng.random_range(0..rest);
        let second = rng.random_range(0..rest - first);
        let mut residual = [first, second, rest - first - second];
        residual.shuffle(rng);
        (main, residual)
    };

    let correct = question.correct().index();
    let mut percentages = [0u8; OPTION_COUNT];
    let mut residual = residual.into_iter();
    for (idx, slot) in percentages.iter_mut().enumerate() {
        *slot = if idx == correct {
            main
        } else {
            residual.next().unwrap_or(0)
        };
    }
    DisplayEffect::AudiencePoll { percentages }
}

fn call_friend<R: Rng + ?Sized>(rng: &mut R) -> DisplayEffect {
    let guess = Letter::from_index(rng.random_range(0..OPTION_COUNT)).unwrap_or(Letter::A);
    DisplayEffect::CallFriend { guess }
}
