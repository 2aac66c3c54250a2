// src/views/playground.rs

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    api::ApiClient,
    error::ClientError,
    models::compiler::{CompilerStatus, ExecuteResponse},
};

/// File name used by `save` when no path is given.
pub const DEFAULT_SAVE_FILE: &str = "code.py";

/// Code shown when the playground opens.
pub const WELCOME_CODE: &str = r#"# Welcome to the online Python playground!
# Write your code here

print("Hello, world!")

# for i in range(5):
#     print(f"Number: {i}")
"#;

/// A ready-made snippet from the example library.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Example {
    pub name: &'static str,
    pub code: &'static str,
}

pub const EXAMPLES: &[Example] = &[
    Example {
        name: "Hello, world!",
        code: "print(\"Hello, world!\")\nprint(\"Welcome to Python!\")\n",
    },
    Example {
        name: "Calculator",
        code: r#"# A calculator without input() for the demo
def calculator(a, b, operation):
    if operation == '+':
        return a + b
    elif operation == '-':
        return a - b
    elif operation == '*':
        return a * b
    elif operation == '/':
        if b != 0:
            return a / b
        else:
            return "Error: division by zero"
    else:
        return "Unknown operation"

print("Calculator:")
print(f"5 + 3 = {calculator(5, 3, '+')}")
print(f"10 - 4 = {calculator(10, 4, '-')}")
print(f"6 * 7 = {calculator(6, 7, '*')}")
print(f"15 / 3 = {calculator(15, 3, '/')}")
print(f"8 / 0 = {calculator(8, 0, '/')}")
"#,
    },
    Example {
        name: "Lists and loops",
        code: r#"fruits = ['apple', 'banana', 'orange', 'grape']

print("Fruits in the list:")
for i, fruit in enumerate(fruits, 1):
    print(f"{i}. {fruit}")

print(f"\nTotal fruits: {len(fruits)}")
"#,
    },
    Example {
        name: "Functions",
        code: r#"def greet(name, age):
    return f"Hello, {name}! You are {age}."

def calculate_area(length, width):
    return length * width

print(greet("Anna", 25))
print(f"Rectangle area: {calculate_area(5, 3)}")
"#,
    },
    Example {
        name: "Interactive calculator",
        code: r#"# input() waits for stdin, which the execution service does not provide
print("Interactive calculator:")
try:
    a = float(input("First number: "))
    b = float(input("Second number: "))
    operation = input("Operation (+, -, *, /): ")

    if operation == '+':
        result = a + b
    elif operation == '-':
        result = a - b
    elif operation == '*':
        result = a * b
    elif operation == '/':
        result = a / b
    else:
        result = "Unknown operation"

    print(f"Result: {result}")
except:
    print("Error: input() is not available here")
    print("Use the 'Calculator' example instead")
"#,
    },
];

/// Example by its 1-based number in the catalogue.
pub fn example(number: usize) -> Option<&'static Example> {
    number.checked_sub(1).and_then(|i| EXAMPLES.get(i))
}

pub fn render_examples() -> String {
    let mut out = String::from("Examples\n");
    for (i, example) in EXAMPLES.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {}", i + 1, example.name);
    }
    out
}

pub fn render_status(status: &CompilerStatus) -> String {
    if status.success {
        let mut line = format!(
            "Execution service: {}",
            status.version.as_deref().unwrap_or("unknown version")
        );
        if let Some(message) = status.message.as_deref().filter(|m| !m.is_empty()) {
            let _ = write!(line, " ({})", message);
        }
        line
    } else {
        format!(
            "Execution service unavailable: {}",
            status
                .error
                .as_deref()
                .or(status.message.as_deref())
                .unwrap_or("no details")
        )
    }
}

/// What the playground shows after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Output(String),
    Failed(String),
}

/// Runs a snippet remotely. Never fails: every error becomes displayable text.
pub async fn run_snippet(api: &ApiClient, code: &str) -> RunOutcome {
    outcome_from(api.execute_code(code).await)
}

fn outcome_from(response: Result<ExecuteResponse, ClientError>) -> RunOutcome {
    match response {
        Ok(resp) if resp.success => RunOutcome::Output(
            resp.output
                .filter(|o| !o.is_empty())
                .unwrap_or_else(|| "Code executed successfully".to_string()),
        ),
        Ok(resp) => RunOutcome::Failed(
            resp.error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "Code execution error".to_string()),
        ),
        Err(ClientError::Validation(msg)) => RunOutcome::Failed(msg),
        Err(e) => {
            tracing::debug!("Execution service unreachable: {}", e);
            RunOutcome::Failed("Could not connect to the server. Try again later.".to_string())
        }
    }
}

/// One line typed on the playground screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaygroundCommand {
    Run,
    /// Replace the code with lines typed until a lone `.`.
    Edit,
    Clear,
    Show,
    Examples,
    /// Zero-based index into [`EXAMPLES`].
    Load(usize),
    Save(Option<PathBuf>),
    Open(PathBuf),
    /// Leave the screen, optionally for another path.
    Leave(Option<String>),
}

impl PlaygroundCommand {
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let (word, arg) = match input.split_once(char::is_whitespace) {
            Some((word, arg)) => (word, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (input, None),
        };

        match (word, arg) {
            ("run" | "r", None) => Some(PlaygroundCommand::Run),
            ("edit" | "e", None) => Some(PlaygroundCommand::Edit),
            ("clear", None) => Some(PlaygroundCommand::Clear),
            ("show", None) => Some(PlaygroundCommand::Show),
            ("examples", None) => Some(PlaygroundCommand::Examples),
            ("load", Some(n)) => n
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .filter(|i| *i < EXAMPLES.len())
                .map(PlaygroundCommand::Load),
            ("save", path) => Some(PlaygroundCommand::Save(path.map(PathBuf::from))),
            ("open", Some(path)) => Some(PlaygroundCommand::Open(PathBuf::from(path))),
            ("" | "q", None) => Some(PlaygroundCommand::Leave(None)),
            (path, None) if path.starts_with('/') => {
                Some(PlaygroundCommand::Leave(Some(path.to_string())))
            }
            _ => None,
        }
    }
}

/// Editable snippet plus the outcome of its last run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playground {
    pub code: String,
    pub last_run: Option<RunOutcome>,
}

impl Default for Playground {
    fn default() -> Self {
        Self::new(WELCOME_CODE)
    }
}

impl Playground {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            last_run: None,
        }
    }

    /// Replaces the code and forgets the previous run.
    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
        self.last_run = None;
    }

    pub fn clear(&mut self) {
        self.set_code(String::new());
    }

    /// Loads the example at `index` (zero-based).
    pub fn load_example(&mut self, index: usize) -> Option<&'static Example> {
        let example = EXAMPLES.get(index)?;
        self.set_code(example.code);
        Some(example)
    }

    /// Reads the code from a local file.
    pub fn open(&mut self, path: &Path) -> Result<(), ClientError> {
        let code = fs::read_to_string(path)?;
        self.set_code(code);
        Ok(())
    }

    /// Writes the code to `path`, or to [`DEFAULT_SAVE_FILE`]. Returns the path written.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf, ClientError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SAVE_FILE));
        fs::write(&path, &self.code)?;
        tracing::info!("Saved {} bytes of code to {:?}", self.code.len(), path);
        Ok(path)
    }

    pub async fn run(&mut self, api: &ApiClient) -> &RunOutcome {
        self.last_run.insert(run_snippet(api, &self.code).await)
    }
}
