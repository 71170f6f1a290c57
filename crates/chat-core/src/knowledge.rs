//! Keyword knowledge base.
//!
//! Rules are scanned in list order and the first rule with any keyword
//! contained in the lowercased input wins. Position is priority: "tell me a
//! joke about css" is a joke because the joke rule comes first, and "html and
//! css" answers HTML because that rule precedes CSS.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Text(String),
    /// One of several answers, picked from the input so the lookup stays
    /// deterministic.
    OneOf(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub keywords: Vec<String>,
    pub answer: Answer,
}

impl Rule {
    pub fn text(keywords: &[&str], answer: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            answer: Answer::Text(answer.to_string()),
        }
    }

    pub fn one_of(keywords: &[&str], answers: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            answer: Answer::OneOf(answers.iter().map(|a| a.to_string()).collect()),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    rules: Vec<Rule>,
}

impl KnowledgeBase {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule at the lowest priority.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First-match-wins lookup. `lowered` must already be lowercased; it is
    /// padded with spaces so keywords like `" js "` match at the edges.
    pub fn lookup(&self, lowered: &str) -> Option<String> {
        let padded = format!(" {} ", lowered);
        let rule = self.rules.iter().find(|rule| rule.matches(&padded))?;
        match &rule.answer {
            Answer::Text(text) => Some(text.clone()),
            Answer::OneOf(options) if !options.is_empty() => {
                let pick = lowered.chars().count() % options.len();
                Some(options[pick].clone())
            }
            Answer::OneOf(_) => None,
        }
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

fn default_rules() -> Vec<Rule> {
    vec![
        Rule::one_of(&["joke", "make me laugh", "something funny"], JOKES),
        Rule::text(
            &["weather", "forecast", "temperature outside"],
            "I can't check live weather, but my imaginary window says: **sunny, 24°C**, with a light breeze. Perfect coding weather!",
        ),
        Rule::text(
            &["javascript", " js ", "ecmascript"],
            "**JavaScript** is the programming language of the web. It runs in every browser and adds interactivity to pages: events, DOM updates, network requests and more.",
        ),
        Rule::text(
            &["html"],
            "**HTML** stands for HyperText Markup Language. It describes the structure of a web page using elements like `<h1>`, `<p>` and `<a>`.",
        ),
        Rule::text(
            &["css", "stylesheet"],
            "**CSS** (Cascading Style Sheets) controls how HTML looks: colors, layout, spacing, fonts and animations.",
        ),
        Rule::text(
            &["webassembly", "wasm"],
            "**WebAssembly** is a compact binary format that lets languages like Rust run in the browser at near-native speed. This chatbot runs on it!",
        ),
        Rule::text(
            &["rust"],
            "**Rust** is a systems programming language focused on safety, speed and concurrency, with memory safety guaranteed at compile time.",
        ),
        Rule::text(
            &["python"],
            "**Python** is a high-level, general-purpose language known for its readable syntax. It is popular for scripting, data science and machine learning.",
        ),
        Rule::text(
            &["artificial intelligence", "machine learning"],
            "**Artificial intelligence** is the field of building systems that perform tasks normally requiring human intelligence, such as understanding language or recognizing images.",
        ),
        Rule::text(
            &["your name", "who are you", "what are you"],
            "I'm a small client-side chatbot. I answer from a local knowledge base and can do arithmetic, all inside your browser.",
        ),
        Rule::text(
            &["help", "what can you do"],
            "I can explain web topics (HTML, CSS, JavaScript, WebAssembly, Rust, Python), **calculate** expressions like `(2 + 3) * 4` or `sqrt(16)`, tell jokes, and keep separate chats in the sidebar.",
        ),
        Rule::text(
            &["thank"],
            "You're welcome! Anything else I can help with?",
        ),
        Rule::text(
            &["goodbye", "bye", "see you"],
            "Goodbye! Your chats are saved, so you can pick up where you left off.",
        ),
        Rule::text(
            &["hello", "hey", "good morning", "good afternoon", "good evening", "greetings"],
            "Hello! How can I help you today?",
        ),
        Rule::text(
            &["how are you"],
            "I'm just a bundle of rules and arithmetic, but I'm running smoothly. Thanks for asking!",
        ),
    ]
}

const JOKES: &[&str] = &[
    "Why do programmers prefer dark mode? Because light attracts bugs.",
    "There are 10 kinds of people: those who understand binary and those who don't.",
    "A SQL query walks into a bar, walks up to two tables and asks: \"Can I join you?\"",
    "Why did the developer go broke? Because he used up all his cache.",
];
