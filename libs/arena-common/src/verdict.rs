//! Verdict Taxonomy - What a judged run means to the user
//!
//! Every presentation value (label, color, icon, hints) is an exhaustive
//! match on [`Verdict`], so adding a variant fails the build until each
//! table has an entry for it.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Accepted,
    #[serde(rename = "Wrong Answer")]
    WrongAnswer,
    #[serde(rename = "Time Limit Exceeded")]
    TimeLimitExceeded,
    #[serde(rename = "Memory Limit Exceeded")]
    MemoryLimitExceeded,
    #[serde(rename = "Runtime Error")]
    RuntimeError,
    #[serde(rename = "Compilation Error", alias = "Compile Error")]
    CompilationError,
    #[serde(rename = "Internal Error")]
    InternalError,
}

/// Alert level used when a verdict is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// A remediation hint shown under a failed verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hint {
    pub title: &'static str,
    pub description: &'static str,
    pub example: Option<&'static str>,
}

const fn hint(title: &'static str, description: &'static str) -> Hint {
    Hint {
        title,
        description,
        example: None,
    }
}

/// Keyword groups tried in order; the first group with a match wins.
const KEYWORDS: &[(&[&str], Verdict)] = &[
    (&["timeout", "time limit", "timed out"], Verdict::TimeLimitExceeded),
    (&["memory"], Verdict::MemoryLimitExceeded),
    (&["compilation", "compile", "syntax"], Verdict::CompilationError),
    (&["internal error"], Verdict::InternalError),
];

const WRONG_ANSWER_HINTS: &[Hint] = &[
    hint(
        "Check Your Logic",
        "Review your algorithm step by step. Make sure you understand the problem requirements correctly.",
    ),
    hint(
        "Test with Examples",
        "Run your code with the provided examples and trace through the execution manually.",
    ),
    Hint {
        title: "Handle Edge Cases",
        description: "Consider special cases like empty inputs, single elements, or boundary values.",
        example: Some("if (nums.length === 0) {\n    return [];\n}"),
    },
];

const TIME_LIMIT_HINTS: &[Hint] = &[
    hint(
        "Optimize Time Complexity",
        "Your algorithm might be too slow. Look for ways to reduce time complexity (e.g., O(n^2) to O(n log n)).",
    ),
    Hint {
        title: "Avoid Nested Loops",
        description: "Multiple nested loops can cause timeout. Consider using hash maps or other data structures.",
        example: Some("const map = new Map();\nfor (let i = 0; i < n; i++) {\n    // O(1) lookup instead of O(n)\n}"),
    },
    hint(
        "Check for Infinite Loops",
        "Make sure your loops have proper termination conditions.",
    ),
];

const MEMORY_LIMIT_HINTS: &[Hint] = &[
    hint(
        "Reduce Space Usage",
        "Try to solve the problem with less memory. Reuse variables and avoid creating unnecessary data structures.",
    ),
    Hint {
        title: "Use In-Place Operations",
        description: "Modify the input array directly instead of creating new arrays when possible.",
        example: Some("for (let i = 0; i < nums.length; i++) {\n    nums[i] *= 2;\n}"),
    },
];

const RUNTIME_ERROR_HINTS: &[Hint] = &[
    Hint {
        title: "Check Array Bounds",
        description: "Make sure you're not accessing array elements outside the valid range.",
        example: Some("if (i >= 0 && i < arr.length) {\n    return arr[i];\n}"),
    },
    Hint {
        title: "Handle Null/Undefined",
        description: "Check for null or undefined values before using them.",
        example: Some("if (node !== null && node.val !== undefined) {\n    // Safe to use node.val\n}"),
    },
    Hint {
        title: "Avoid Division by Zero",
        description: "Check denominators before division operations.",
        example: Some("if (denominator !== 0) {\n    result = numerator / denominator;\n}"),
    },
];

const COMPILATION_HINTS: &[Hint] = &[
    hint(
        "Check Syntax",
        "Look for missing semicolons, brackets, or parentheses.",
    ),
    Hint {
        title: "Variable Declarations",
        description: "Make sure all variables are properly declared before use.",
        example: Some("let result = 0;\nconst arr = [1, 2, 3];"),
    },
    hint(
        "Function Syntax",
        "Ensure your function signature matches the expected format.",
    ),
];

const INTERNAL_ERROR_HINTS: &[Hint] = &[hint(
    "Try Again",
    "This might be a temporary issue. Please try submitting your solution again.",
)];

impl Verdict {
    pub const ALL: [Verdict; 7] = [
        Verdict::Accepted,
        Verdict::WrongAnswer,
        Verdict::TimeLimitExceeded,
        Verdict::MemoryLimitExceeded,
        Verdict::RuntimeError,
        Verdict::CompilationError,
        Verdict::InternalError,
    ];

    /// Best-effort classification of a terminal outcome.
    ///
    /// Substring heuristics, case-insensitive and order-sensitive: the
    /// first matching keyword group decides. A message with no keyword is a
    /// runtime error; an unsuccessful outcome with no message at all is a
    /// wrong answer.
    pub fn classify(success: bool, error: Option<&str>) -> Verdict {
        if success {
            return Verdict::Accepted;
        }

        let message = match error.map(str::trim) {
            Some(message) if !message.is_empty() => message.to_lowercase(),
            _ => return Verdict::WrongAnswer,
        };

        KEYWORDS
            .iter()
            .find(|(words, _)| words.iter().any(|w| message.contains(w)))
            .map(|(_, verdict)| *verdict)
            .unwrap_or(Verdict::RuntimeError)
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Accepted => "Accepted",
            Verdict::WrongAnswer => "Wrong Answer",
            Verdict::TimeLimitExceeded => "Time Limit Exceeded",
            Verdict::MemoryLimitExceeded => "Memory Limit Exceeded",
            Verdict::RuntimeError => "Runtime Error",
            Verdict::CompilationError => "Compilation Error",
            Verdict::InternalError => "Internal Error",
        }
    }

    pub fn short_code(&self) -> &'static str {
        match self {
            Verdict::Accepted => "AC",
            Verdict::WrongAnswer => "WA",
            Verdict::TimeLimitExceeded => "TLE",
            Verdict::MemoryLimitExceeded => "MLE",
            Verdict::RuntimeError => "RE",
            Verdict::CompilationError => "CE",
            Verdict::InternalError => "IE",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Verdict::Accepted => "green",
            Verdict::TimeLimitExceeded | Verdict::MemoryLimitExceeded => "orange",
            Verdict::WrongAnswer
            | Verdict::RuntimeError
            | Verdict::CompilationError
            | Verdict::InternalError => "red",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Verdict::Accepted => "check-circle",
            Verdict::WrongAnswer => "close-circle",
            Verdict::TimeLimitExceeded => "clock-circle",
            Verdict::MemoryLimitExceeded => "warning",
            Verdict::RuntimeError => "exclamation-circle",
            Verdict::CompilationError => "code",
            Verdict::InternalError => "question-circle",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Verdict::Accepted => Severity::Success,
            Verdict::WrongAnswer => Severity::Info,
            Verdict::TimeLimitExceeded | Verdict::MemoryLimitExceeded => Severity::Warning,
            Verdict::RuntimeError | Verdict::CompilationError | Verdict::InternalError => {
                Severity::Error
            }
        }
    }

    pub fn description(&self, passed: u32, total: u32) -> String {
        match self {
            Verdict::Accepted => "Your solution is correct!".to_string(),
            Verdict::WrongAnswer => format!(
                "Your solution produced incorrect output. {}/{} test cases passed.",
                passed, total
            ),
            Verdict::TimeLimitExceeded => {
                "Your solution took too long to execute. Consider optimizing your algorithm."
                    .to_string()
            }
            Verdict::MemoryLimitExceeded => {
                "Your solution used too much memory. Try to reduce memory usage.".to_string()
            }
            Verdict::RuntimeError => "Your code crashed during execution. Check for null \
                 pointer exceptions, array bounds, etc."
                .to_string(),
            Verdict::CompilationError => {
                "Your code failed to compile. Check for syntax errors.".to_string()
            }
            Verdict::InternalError => {
                "An internal server error occurred. Please try again.".to_string()
            }
        }
    }

    pub fn hints(&self) -> &'static [Hint] {
        match self {
            Verdict::Accepted => &[],
            Verdict::WrongAnswer => WRONG_ANSWER_HINTS,
            Verdict::TimeLimitExceeded => TIME_LIMIT_HINTS,
            Verdict::MemoryLimitExceeded => MEMORY_LIMIT_HINTS,
            Verdict::RuntimeError => RUNTIME_ERROR_HINTS,
            Verdict::CompilationError => COMPILATION_HINTS,
            Verdict::InternalError => INTERNAL_ERROR_HINTS,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
