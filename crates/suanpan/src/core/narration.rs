//! Narration: place names, step messages and shell announcements
//!
//! Every step carries two strings, one for display and one shaped for a
//! speech engine. Traditional Chinese is the reference wording; English is a
//! straight rendering of the same moves.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::abacus::Abacus;
use crate::core::question::{Operator, Question};
use crate::core::steps::Formula;
use crate::core::AbacusError;

// One name per rod of the widest abacus.
const ZH_PLACES: [&str; Abacus::MAX_WIDTH] = [
    "個", "十", "百", "千", "萬", "十萬", "百萬", "千萬", "億", "十億", "百億", "千億", "兆",
    "十兆", "百兆", "千兆", "京", "十京", "百京", "千京",
];

const EN_PLACES: [&str; Abacus::MAX_WIDTH] = [
    "ones",
    "tens",
    "hundreds",
    "thousands",
    "ten-thousands",
    "hundred-thousands",
    "millions",
    "ten-millions",
    "hundred-millions",
    "billions",
    "ten-billions",
    "hundred-billions",
    "trillions",
    "ten-trillions",
    "hundred-trillions",
    "quadrillions",
    "ten-quadrillions",
    "hundred-quadrillions",
    "quintillions",
    "ten-quintillions",
];

/// Language used for step messages and announcements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    /// Traditional Chinese (Taiwan)
    #[default]
    ZhTw,
    /// English
    En,
}

/// A display line and its spoken form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    /// Text for the screen
    pub display: String,
    /// Text for a speech engine
    pub speech: String,
}

impl Utterance {
    fn new(display: impl Into<String>, speech: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            speech: speech.into(),
        }
    }
}

impl Locale {
    /// BCP 47 tag, as a speech engine expects it
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::ZhTw => "zh-TW",
            Self::En => "en",
        }
    }

    /// Traditional name of the `10^power` place
    #[must_use]
    pub fn place_name(self, power: usize) -> String {
        let table = match self {
            Self::ZhTw => &ZH_PLACES,
            Self::En => &EN_PLACES,
        };
        table
            .get(power)
            .map_or_else(|| format!("10^{power}"), |name| (*name).to_string())
    }

    fn column(self, power: usize, action: &str) -> Utterance {
        let place = self.place_name(power);
        match self {
            Self::ZhTw => Utterance::new(format!("{place}位：{action}"), format!("{place}位{action}")),
            Self::En => Utterance::new(
                format!("{}: {action}", capitalize(&place)),
                format!("{place} column, {action}"),
            ),
        }
    }

    /// Announces that `n1` is about to be set
    #[must_use]
    pub fn intro(self, n1: u64) -> Utterance {
        match self {
            Self::ZhTw => Utterance::new(format!("準備撥入第一數：{n1}"), format!("準備撥入{n1}")),
            Self::En => Utterance::new(
                format!("Get ready to enter the first number: {n1}"),
                format!("Get ready to enter {n1}"),
            ),
        }
    }

    /// A digit of `n1` pushed onto an empty rod
    #[must_use]
    pub fn enter(self, power: usize, digit: u8) -> Utterance {
        match self {
            Self::ZhTw => {
                let place = self.place_name(power);
                Utterance::new(format!("{place}位：撥入 {digit}"), format!("{place}位撥入{digit}"))
            }
            Self::En => self.column(power, &format!("enter {digit}")),
        }
    }

    /// Announces the operation and the second operand
    #[must_use]
    pub fn transition(self, operator: Operator, n2: u64) -> Utterance {
        match self {
            Self::ZhTw => {
                let verb = operator_word(self, operator);
                Utterance::new(format!("準備{verb}第二數：{n2}"), format!("準備{verb}{n2}"))
            }
            Self::En => {
                let verb = operator_word(self, operator);
                Utterance::new(
                    format!("Get ready to {verb} the second number: {n2}"),
                    format!("Get ready to {verb} {n2}"),
                )
            }
        }
    }

    /// A digit of `n2` applied to its rod, with the formula used if any
    #[must_use]
    pub fn apply(
        self,
        power: usize,
        operator: Operator,
        digit: u8,
        formula: Option<Formula>,
    ) -> Utterance {
        let action = formula.map_or_else(
            || self.direct(operator, digit),
            |formula| self.formula_label(formula),
        );
        self.column(power, &action)
    }

    fn direct(self, operator: Operator, digit: u8) -> String {
        match (self, operator) {
            (Self::ZhTw, Operator::Add) => format!("直加 {digit}"),
            (Self::ZhTw, Operator::Subtract) => format!("直減 {digit}"),
            (Self::En, Operator::Add) => format!("direct add {digit}"),
            (Self::En, Operator::Subtract) => format!("direct subtract {digit}"),
        }
    }

    /// One carried into the rod at `power`
    #[must_use]
    pub fn carry(self, power: usize) -> Utterance {
        match self {
            Self::ZhTw => {
                let place = self.place_name(power);
                Utterance::new(format!("{place}位：進位 加 1"), format!("{place}位進位加一"))
            }
            Self::En => self.column(power, "carry, add 1"),
        }
    }

    /// One borrowed from the rod at `power`
    #[must_use]
    pub fn borrow(self, power: usize) -> Utterance {
        match self {
            Self::ZhTw => {
                let place = self.place_name(power);
                Utterance::new(format!("{place}位：退位 減 1"), format!("{place}位退位減一"))
            }
            Self::En => self.column(power, "borrow, subtract 1"),
        }
    }

    /// Mnemonic label of a complement formula
    #[must_use]
    pub fn formula_label(self, formula: Formula) -> String {
        let digit = i16::from(formula.digit());
        match (self, formula) {
            (Self::ZhTw, Formula::AddFive { .. }) => format!("加 5 減 {}", 5 - digit),
            (Self::ZhTw, Formula::AddTen { .. }) => format!("減 {} 加 10", 10 - digit),
            (Self::ZhTw, Formula::SubtractFive { .. }) => format!("減 5 加 {}", 5 - digit),
            (Self::ZhTw, Formula::SubtractTen { .. }) => format!("減 10 加 {}", 10 - digit),
            (Self::En, Formula::AddFive { .. }) => format!("add 5, subtract {}", 5 - digit),
            (Self::En, Formula::AddTen { .. }) => format!("subtract {}, add 10", 10 - digit),
            (Self::En, Formula::SubtractFive { .. }) => format!("subtract 5, add {}", 5 - digit),
            (Self::En, Formula::SubtractTen { .. }) => format!("subtract 10, add {}", 10 - digit),
        }
    }

    /// Announcement for a freshly posed question
    #[must_use]
    pub fn question_posed(self, question: &Question) -> Utterance {
        let verb = operator_word(self, question.operator());
        match self {
            Self::ZhTw => Utterance::new(
                format!("題目：{question}"),
                format!("準備好了，題目是：{} {verb} {}", question.n1(), question.n2()),
            ),
            Self::En => Utterance::new(
                format!("Question: {question}"),
                format!("Ready. The question is {} {verb} {}", question.n1(), question.n2()),
            ),
        }
    }

    /// Praise for a correct answer
    #[must_use]
    pub fn correct(self) -> Utterance {
        match self {
            Self::ZhTw => Utterance::new("太棒了！撥珠完全正確！", "太棒了，撥珠完全正確"),
            Self::En => Utterance::new(
                "Excellent! The beads are exactly right!",
                "Excellent, the beads are exactly right",
            ),
        }
    }

    /// Feedback for a wrong answer
    #[must_use]
    pub fn incorrect(self, entered: u64, target: u64) -> Utterance {
        match self {
            Self::ZhTw => Utterance::new(
                format!("哎呀，不對喔。撥出的值是 {entered}，正確應該是 {target}。再試一次！"),
                "不對喔，再檢查一下",
            ),
            Self::En => Utterance::new(
                format!("Not quite. The beads show {entered}, the answer is {target}. Try again!"),
                "Not quite, check again",
            ),
        }
    }

    /// Lead-in for the corrective walk-through
    #[must_use]
    pub fn correction_intro(self) -> Utterance {
        match self {
            Self::ZhTw => Utterance::new(
                "正確撥珠步驟回顧",
                "別擔心，下面為你列出了正確的撥珠步驟，請參考看看。",
            ),
            Self::En => Utterance::new(
                "Correct bead moves",
                "Don't worry, here are the correct bead moves to compare with.",
            ),
        }
    }

    /// Abacus cleared
    #[must_use]
    pub fn reset(self) -> Utterance {
        match self {
            Self::ZhTw => Utterance::new("算盤已歸零", "算盤已歸零清空"),
            Self::En => Utterance::new("Abacus cleared", "The abacus is cleared"),
        }
    }

    /// Teaching mode left
    #[must_use]
    pub fn teaching_exited(self) -> Utterance {
        match self {
            Self::ZhTw => Utterance::new("已退出教學模式", "已退出教學模式"),
            Self::En => Utterance::new("Left teaching mode", "Left teaching mode"),
        }
    }

    /// Encouragement used when no AI tip is available
    #[must_use]
    pub const fn fallback_tip(self) -> &'static str {
        match self {
            Self::ZhTw => "加油！珠心算需要多加練習，相信你下次一定能撥對。記得檢查口訣喔！",
            Self::En => {
                "Keep going! Abacus skills grow with practice, you'll get it next time. Remember to check the formula!"
            }
        }
    }

    /// Explanation used when no AI formula explanation is available
    #[must_use]
    pub const fn fallback_formula(self) -> &'static str {
        match self {
            Self::ZhTw => "這個口訣是珠心算的精髓，多練習幾次就會上手囉！",
            Self::En => "This formula is at the heart of abacus work. A few more tries and it will click!",
        }
    }
}

fn operator_word(locale: Locale, operator: Operator) -> &'static str {
    match (locale, operator) {
        (Locale::ZhTw, Operator::Add) => "加",
        (Locale::ZhTw, Operator::Subtract) => "減",
        (Locale::En, Operator::Add) => "add",
        (Locale::En, Operator::Subtract) => "subtract",
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZhTw => write!(f, "zh-tw"),
            Self::En => write!(f, "en"),
        }
    }
}

impl FromStr for Locale {
    type Err = AbacusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "zh-tw" | "zh" | "zh-hant" => Ok(Self::ZhTw),
            "en" | "en-us" | "en-gb" => Ok(Self::En),
            _ => Err(AbacusError::InvalidLocale(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_names_zh() {
        assert_eq!(Locale::ZhTw.place_name(0), "個");
        assert_eq!(Locale::ZhTw.place_name(1), "十");
        assert_eq!(Locale::ZhTw.place_name(4), "萬");
        assert_eq!(Locale::ZhTw.place_name(8), "億");
    }

    #[test]
    fn test_place_names_past_hundred_millions() {
        assert_eq!(Locale::ZhTw.place_name(9), "十億");
        assert_eq!(Locale::ZhTw.place_name(12), "兆");
        assert_eq!(Locale::ZhTw.place_name(19), "千京");
        assert_eq!(Locale::En.place_name(9), "billions");
        assert_eq!(Locale::En.place_name(12), "trillions");
        assert_eq!(Locale::En.place_name(19), "ten-quintillions");
    }

    #[test]
    fn test_every_rod_of_widest_abacus_is_named() {
        for power in 0..Abacus::MAX_WIDTH {
            assert!(!Locale::ZhTw.place_name(power).starts_with("10^"));
            assert!(!Locale::En.place_name(power).starts_with("10^"));
        }
    }

    #[test]
    fn test_place_names_past_table() {
        assert_eq!(Locale::ZhTw.place_name(20), "10^20");
        assert_eq!(Locale::En.place_name(25), "10^25");
    }

    #[test]
    fn test_enter_on_tenth_rod_en() {
        let line = Locale::En.enter(9, 4);
        assert_eq!(line.display, "Billions: enter 4");
        assert_eq!(line.speech, "billions column, enter 4");
    }

    #[test]
    fn test_enter_zh() {
        let line = Locale::ZhTw.enter(1, 3);
        assert_eq!(line.display, "十位：撥入 3");
        assert_eq!(line.speech, "十位撥入3");
    }

    #[test]
    fn test_enter_en() {
        let line = Locale::En.enter(2, 6);
        assert_eq!(line.display, "Hundreds: enter 6");
        assert_eq!(line.speech, "hundreds column, enter 6");
    }

    #[test]
    fn test_intro_and_transition_zh() {
        assert_eq!(Locale::ZhTw.intro(12).display, "準備撥入第一數：12");
        let line = Locale::ZhTw.transition(Operator::Subtract, 7);
        assert_eq!(line.display, "準備減第二數：7");
        assert_eq!(line.speech, "準備減7");
    }

    #[test]
    fn test_direct_add_message() {
        let line = Locale::ZhTw.apply(0, Operator::Add, 4, None);
        assert_eq!(line.display, "個位：直加 4");
        let line = Locale::En.apply(0, Operator::Subtract, 2, None);
        assert_eq!(line.display, "Ones: direct subtract 2");
    }

    #[test]
    fn test_formula_labels() {
        assert_eq!(Locale::ZhTw.formula_label(Formula::AddFive { digit: 1 }), "加 5 減 4");
        assert_eq!(Locale::ZhTw.formula_label(Formula::AddTen { digit: 5 }), "減 5 加 10");
        assert_eq!(Locale::ZhTw.formula_label(Formula::SubtractFive { digit: 3 }), "減 5 加 2");
        assert_eq!(Locale::ZhTw.formula_label(Formula::SubtractTen { digit: 7 }), "減 10 加 3");
        assert_eq!(
            Locale::En.formula_label(Formula::AddFive { digit: 4 }),
            "add 5, subtract 1"
        );
        assert_eq!(
            Locale::En.formula_label(Formula::SubtractTen { digit: 7 }),
            "subtract 10, add 3"
        );
    }

    #[test]
    fn test_formula_label_keeps_signed_arithmetic() {
        assert_eq!(
            Locale::En.formula_label(Formula::AddFive { digit: 7 }),
            "add 5, subtract -2"
        );
    }

    #[test]
    fn test_carry_and_borrow() {
        assert_eq!(Locale::ZhTw.carry(1).speech, "十位進位加一");
        assert_eq!(Locale::ZhTw.borrow(2).display, "百位：退位 減 1");
        assert_eq!(Locale::En.carry(1).display, "Tens: carry, add 1");
    }

    #[test]
    fn test_incorrect_mentions_values() {
        let line = Locale::En.incorrect(12, 19);
        assert!(line.display.contains("12"));
        assert!(line.display.contains("19"));
    }

    #[test]
    fn test_locale_from_str() {
        assert_eq!("zh-TW".parse::<Locale>().unwrap(), Locale::ZhTw);
        assert_eq!("zh_tw".parse::<Locale>().unwrap(), Locale::ZhTw);
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert!(matches!(
            "fr".parse::<Locale>(),
            Err(AbacusError::InvalidLocale(_))
        ));
    }

    #[test]
    fn test_locale_display_round_trip() {
        for locale in [Locale::ZhTw, Locale::En] {
            assert_eq!(locale.to_string().parse::<Locale>().unwrap(), locale);
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("ten-thousands"), "Ten-thousands");
        assert_eq!(capitalize(""), "");
    }
}
