// ABOUTME: Word lists used to synthesize notification messages

pub const ACTIONS: &[&str] = &[
    "bought this",
    "joined the program",
    "enrolled",
    "got access",
    "completed their purchase",
    "signed up",
    "started their journey",
    "secured their spot",
];

/// `X` is replaced with a number in `NUMBER_RANGE`.
pub const TIMEFRAMES: &[&str] = &[
    "in the last hour",
    "recently",
    "X minutes ago",
    "in the last X hours",
];

pub const COUNTS: &[&str] = &["Two", "Three", "Four", "Five", "Six", "Seven", "Eight"];

pub const NUMBER_PLACEHOLDER: char = 'X';

pub const NUMBER_RANGE: std::ops::RangeInclusive<u32> = 2..=9;
