//! Responder: maps user text (plus the previous reply) to the bot's answer.
//!
//! Evaluation order:
//! 1. "is that correct?"-style follow-ups, judged on the previous reply
//! 2. arithmetic ([`crate::calc`])
//! 3. the keyword [`KnowledgeBase`], first match wins
//! 4. a fixed fallback
//!
//! The result is tagged with `matched` so callers never have to recognise the
//! fallback by its wording.

use crate::calc;
use crate::knowledge::KnowledgeBase;

pub const FALLBACK_REPLY: &str =
    "I'm not sure about that yet. Try asking about HTML, CSS, JavaScript or Rust, or give me something to calculate like `12 * 7`.";

const AFFIRM_REPLY: &str =
    "Yes, that answer comes straight from my knowledge base, so I'm confident it's correct.";

const DEFLECT_REPLY: &str =
    "Honestly, I'm not sure. I didn't have a confident answer to your last question, so please double-check elsewhere.";

const CORRECTNESS_PHRASES: &[&str] = &[
    "is that correct",
    "is that right",
    "is this correct",
    "is this right",
    "is that true",
    "is it true",
    "are you sure",
    "really?",
];

/// A reply and whether it came from a rule or calculation (`matched`) rather
/// than the fallback or an error message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub matched: bool,
}

impl Reply {
    pub fn matched(text: impl Into<String>) -> Self {
        Self { text: text.into(), matched: true }
    }

    pub fn unmatched(text: impl Into<String>) -> Self {
        Self { text: text.into(), matched: false }
    }
}

/// Pure text-in, text-out reply function. Must never return empty text.
pub trait Responder {
    fn respond(&self, user_text: &str, previous: &Reply) -> Reply;
}

/// Responder backed by the local knowledge base and calculator.
#[derive(Debug, Clone, Default)]
pub struct LocalResponder {
    knowledge: KnowledgeBase,
}

impl LocalResponder {
    pub fn new(knowledge: KnowledgeBase) -> Self {
        Self { knowledge }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }
}

impl Responder for LocalResponder {
    fn respond(&self, user_text: &str, previous: &Reply) -> Reply {
        let lowered = user_text.trim().to_lowercase();

        if is_correctness_check(&lowered) {
            return if previous.matched {
                Reply::matched(AFFIRM_REPLY)
            } else {
                Reply::unmatched(DEFLECT_REPLY)
            };
        }

        if let Some(expression) = calc::extract_expression(&lowered) {
            return match calc::evaluate(&expression) {
                Ok(value) => Reply::matched(format!(
                    "{} = **{}**",
                    expression.trim(),
                    calc::format_number(value)
                )),
                Err(e) => {
                    log::debug!("Calculation of {:?} failed: {}", expression, e);
                    Reply::unmatched(format!("Sorry, I couldn't calculate that: {}.", e))
                }
            };
        }

        match self.knowledge.lookup(&lowered) {
            Some(answer) => Reply::matched(answer),
            None => Reply::unmatched(FALLBACK_REPLY),
        }
    }
}

fn is_correctness_check(lowered: &str) -> bool {
    CORRECTNESS_PHRASES.iter().any(|p| lowered.contains(p))
}
