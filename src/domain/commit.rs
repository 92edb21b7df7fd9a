use regex::Regex;
use std::fmt;

/// Header grammar: `type(scope)!: description`
const CONVENTIONAL_HEADER: &str = r"^([A-Za-z]+)(?:\(([^()]*)\))?(!)?:\s*(.*)$";

/// Footer markers recognised when footer scanning is enabled
const BREAKING_FOOTERS: [&str; 2] = ["BREAKING CHANGE:", "BREAKING-CHANGE:"];

/// Keyword fallback for messages that do not follow the header grammar.
///
/// Checked top to bottom against the lowercased message; the first row with
/// a matching keyword wins, anything else is a chore.
const KEYWORD_FALLBACK: [(&[&str], CommitType); 5] = [
    (&["fix", "bug", "resolve", "patch"], CommitType::Fix),
    (&["add", "new", "feature", "implement"], CommitType::Feature),
    (&["update", "upgrade", "bump"], CommitType::Chore),
    (&["refactor", "clean", "reorganize"], CommitType::Refactor),
    (&["doc", "readme", "comment"], CommitType::Docs),
];

/// Commit category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CommitType {
    Feature,
    Fix,
    Docs,
    Style,
    Refactor,
    Performance,
    Test,
    Chore,
    Ci,
    Build,
    Revert,
}

impl CommitType {
    /// All categories in display order.
    pub const ALL: [CommitType; 11] = [
        CommitType::Feature,
        CommitType::Fix,
        CommitType::Docs,
        CommitType::Style,
        CommitType::Refactor,
        CommitType::Performance,
        CommitType::Test,
        CommitType::Chore,
        CommitType::Ci,
        CommitType::Build,
        CommitType::Revert,
    ];

    /// Map a conventional commit type token, including common aliases.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_lowercase().as_str() {
            "feat" | "feature" => Some(CommitType::Feature),
            "fix" => Some(CommitType::Fix),
            "docs" | "doc" => Some(CommitType::Docs),
            "style" => Some(CommitType::Style),
            "refactor" => Some(CommitType::Refactor),
            "perf" | "performance" => Some(CommitType::Performance),
            "test" | "tests" => Some(CommitType::Test),
            "chore" => Some(CommitType::Chore),
            "ci" => Some(CommitType::Ci),
            "build" => Some(CommitType::Build),
            "revert" => Some(CommitType::Revert),
            _ => None,
        }
    }

    /// Canonical conventional commit token.
    pub fn token(&self) -> &'static str {
        match self {
            CommitType::Feature => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Performance => "perf",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
            CommitType::Ci => "ci",
            CommitType::Build => "build",
            CommitType::Revert => "revert",
        }
    }

    /// Plural label used in the statistics section.
    pub fn label(&self) -> &'static str {
        match self {
            CommitType::Feature => "Features",
            CommitType::Fix => "Bug Fixes",
            CommitType::Docs => "Documentation",
            CommitType::Style => "Styles",
            CommitType::Refactor => "Refactoring",
            CommitType::Performance => "Performance",
            CommitType::Test => "Tests",
            CommitType::Chore => "Chores",
            CommitType::Ci => "CI",
            CommitType::Build => "Build",
            CommitType::Revert => "Reverts",
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A commit message reduced to its release-relevant parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedCommit {
    pub r#type: CommitType,
    pub scope: Option<String>,
    pub description: String,
    pub breaking: bool,
    pub hash: String,
}

/// Turns raw commit messages into [`ClassifiedCommit`] records.
///
/// Classification never fails: messages outside the conventional grammar
/// are categorised by keyword.
#[derive(Debug, Clone)]
pub struct CommitClassifier {
    header: Option<Regex>,
    detect_breaking_footer: bool,
}

impl CommitClassifier {
    pub fn new(detect_breaking_footer: bool) -> Self {
        CommitClassifier {
            header: Regex::new(CONVENTIONAL_HEADER).ok(),
            detect_breaking_footer,
        }
    }

    pub fn classify(&self, message: &str, hash: &str) -> ClassifiedCommit {
        let hash = short_hash(hash);
        let mut lines = message.lines();
        let subject = lines.next().unwrap_or("").trim();

        if let Some(captures) = self.header.as_ref().and_then(|re| re.captures(subject)) {
            let commit_type = captures
                .get(1)
                .and_then(|m| CommitType::from_token(m.as_str()));

            if let Some(commit_type) = commit_type {
                let scope = captures
                    .get(2)
                    .map(|m| m.as_str().trim())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string);
                let has_bang = captures.get(3).is_some();
                let description = captures
                    .get(4)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default();

                let breaking = has_bang || (self.detect_breaking_footer && has_breaking_footer(lines));

                return ClassifiedCommit {
                    r#type: commit_type,
                    scope,
                    description,
                    breaking,
                    hash,
                };
            }
        }

        ClassifiedCommit {
            r#type: fallback_type(message),
            scope: None,
            description: subject.to_string(),
            breaking: false,
            hash,
        }
    }
}

impl Default for CommitClassifier {
    fn default() -> Self {
        CommitClassifier::new(false)
    }
}

fn fallback_type(message: &str) -> CommitType {
    let lowered = message.to_lowercase();
    KEYWORD_FALLBACK
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(_, commit_type)| *commit_type)
        .unwrap_or(CommitType::Chore)
}

fn has_breaking_footer<'a>(mut body: impl Iterator<Item = &'a str>) -> bool {
    body.any(|line| {
        let line = line.trim_start();
        BREAKING_FOOTERS.iter().any(|marker| line.starts_with(marker))
    })
}

fn short_hash(hash: &str) -> String {
    hash.chars().take(7).collect()
}
