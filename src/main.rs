// src/main.rs

use std::io::Write as _;
use std::path::PathBuf;

use clap::Parser;
use course_client::{
    config::{Config, TIME_WARNING_SECONDS},
    controller::{Phase, SubmitOutcome, TestSessionController},
    error::ClientError,
    models::{
        lecture::CreateLectureRequest,
        question::{NewQuestion, OptionLabel},
        test::{CreateTestRequest, Test},
        user::{LoginRequest, RegisterRequest, UserAction},
    },
    routes::{self, Route},
    state::AppState,
    utils::format::format_time,
    views::{
        self,
        playground::{Playground, PlaygroundCommand, RunOutcome},
        quiz::QuizCommand,
    },
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "course-client")]
#[command(about = "Terminal client for the Python course: lectures, timed tests, playground")]
#[command(version)]
struct Cli {
    /// Screen to open, e.g. `/tests/3`, `/lectures`, `/admin`
    #[arg(default_value = "/")]
    path: String,

    /// Source file to run when opening `/compiler`
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,
}

/// Where a screen wants to go next. `None` quits.
type Next = Option<String>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load configuration from environment (.env included)
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "client.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    // Screens own stdout; only warnings and errors reach the terminal.
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(LevelFilter::WARN);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    if let Err(e) = run(cli, config).await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: Config) -> Result<(), ClientError> {
    let state = AppState::from_config(config)?;
    tracing::info!(
        "Using API at {} and execution service at {}",
        state.config.api_url,
        state.config.compiler_url
    );
    let mut input = Input::new();
    let mut path = cli.path;

    loop {
        if path.trim() == "/logout" {
            path = views::auth::logout(&state.api, &state.session).await?.path();
            println!("Signed out.");
            continue;
        }

        let route = routes::resolve(&path, &state.session);
        tracing::debug!("Opening {}", route.path());

        let next = match route {
            Route::Home => home(&state, &mut input).await?,
            Route::Lectures => lectures(&state, &mut input).await?,
            Route::LectureDetail(id) => lecture_detail(&state, &mut input, id).await?,
            Route::Tests | Route::TestResult(_) => tests(&state, &mut input).await?,
            Route::TestDetail(id) => take_test(&state, &mut input, id).await?,
            Route::Compiler => playground(&state, &mut input, cli.file.as_deref()).await?,
            Route::Login => login(&state, &mut input).await?,
            Route::Register => register(&state, &mut input).await?,
            Route::Admin => admin(&state, &mut input).await?,
            Route::NotFound(path) => {
                println!("Page not found: {}", path);
                input.navigate().await?
            }
        };

        match next {
            Some(next) => path = next,
            None => return Ok(()),
        }
    }
}

/// Line-oriented stdin.
struct Input {
    lines: Lines<BufReader<Stdin>>,
}

impl Input {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn line(&mut self) -> Result<Option<String>, ClientError> {
        Ok(self.lines.next_line().await?.map(|l| l.trim().to_string()))
    }

    async fn prompt(&mut self, label: &str) -> Result<Option<String>, ClientError> {
        print!("{}", label);
        std::io::stdout().flush()?;
        self.line().await
    }

    /// Asks for the next path. Empty input, `q` or EOF quits.
    async fn navigate(&mut self) -> Result<Next, ClientError> {
        match self.prompt("\ngo to (path, 'q' to quit)> ").await? {
            Some(line) if !line.is_empty() && line != "q" => Ok(Some(line)),
            _ => Ok(None),
        }
    }
}

async fn home(state: &AppState, input: &mut Input) -> Result<Next, ClientError> {
    use course_client::identity::IdentityProvider;

    println!("Python Course");
    match state.session.current_user() {
        Some(user) => println!("Signed in as {}", user.username),
        None => println!("Not signed in (/login, /register)"),
    }
    println!("  /lectures   read the lectures");
    println!("  /tests      take a timed test");
    println!("  /compiler   run a Python snippet");
    if state.session.is_admin() {
        println!("  /admin      manage the course");
    }
    println!("  /logout     sign out");
    input.navigate().await
}

async fn lectures(state: &AppState, input: &mut Input) -> Result<Next, ClientError> {
    match state.api.list_lectures().await {
        Ok(list) => print!("{}", views::lectures::render_list(&list)),
        Err(e) => println!("Could not load lectures: {}", e.message()),
    }
    input.navigate().await
}

async fn lecture_detail(state: &AppState, input: &mut Input, id: i64) -> Result<Next, ClientError> {
    let detail = match views::lectures::load_detail(&state.api, id).await {
        Ok(detail) => detail,
        Err(e) => {
            println!("Lecture not found: {}", e.message());
            return input.navigate().await;
        }
    };
    print!("{}", views::lectures::render_detail(&detail));

    match input.navigate().await? {
        Some(cmd) if cmd == "p" => Ok(detail
            .previous
            .map(|l| Route::LectureDetail(l.id).path())
            .or(Some(Route::LectureDetail(id).path()))),
        Some(cmd) if cmd == "n" => Ok(detail
            .next
            .map(|l| Route::LectureDetail(l.id).path())
            .or(Some(Route::LectureDetail(id).path()))),
        other => Ok(other),
    }
}

async fn tests(state: &AppState, input: &mut Input) -> Result<Next, ClientError> {
    match state.api.list_tests().await {
        Ok(list) => print!("{}", views::quiz::render_catalogue(&list)),
        Err(e) => println!("Could not load tests: {}", e.message()),
    }
    input.navigate().await
}

async fn take_test(state: &AppState, input: &mut Input, id: i64) -> Result<Next, ClientError> {
    let test = match state.api.get_test(id).await {
        Ok(test) => test,
        Err(e) => {
            println!("Test not found: {}", e.message());
            return input.navigate().await;
        }
    };

    if test.questions.is_empty() {
        println!("This test has no questions.");
        return input.navigate().await;
    }

    let controller = TestSessionController::new(test.clone(), state.scorer(), &state.session);
    print!("{}", views::quiz::render_intro(&test, controller.account_name()));

    // Name confirmation
    loop {
        let label = if controller.account_name().is_some() {
            "press Enter to start> "
        } else {
            "your name> "
        };
        let Some(name) = input.prompt(label).await? else {
            return Ok(None);
        };
        match controller.start(&name) {
            Ok(()) => break,
            Err(e) => println!("{}", e.message()),
        }
    }

    println!("Commands: a-d answer, n next, p previous, <number> jump, f finish, q leave");
    print!("{}", controller.view(views::quiz::render_question));

    let mut status = controller.subscribe();
    let mut last_shown = controller.status().remaining_secs;

    loop {
        tokio::select! {
            line = input.line() => {
                let Some(cmd) = line? else {
                    return Ok(None);
                };
                match QuizCommand::parse(&cmd) {
                    Some(QuizCommand::Answer(label)) => { controller.answer_current(label); }
                    Some(QuizCommand::Next) => { controller.next(); }
                    Some(QuizCommand::Previous) => { controller.previous(); }
                    Some(QuizCommand::Jump(index)) => { controller.go_to(index); }
                    Some(QuizCommand::Leave) => return Ok(Some(Route::Tests.path())),
                    Some(QuizCommand::Finish) => match controller.submit().await {
                        Ok(SubmitOutcome::Scored(result)) => {
                            print!("{}", views::results::render_result(&result, &test));
                            return input.navigate().await;
                        }
                        Ok(SubmitOutcome::Skipped) => {}
                        Err(e) => println!("Error submitting the test: {}. Type 'f' to retry.", e.message()),
                    },
                    None => {}
                }
                if controller.status().phase == Phase::Running {
                    print!("{}", controller.view(views::quiz::render_question));
                }
            }
            changed = status.changed() => {
                if changed.is_err() {
                    return Ok(None);
                }
                let snapshot = status.borrow_and_update().clone();
                match snapshot.phase {
                    Phase::Submitted => {
                        if let Some(result) = snapshot.result {
                            print!("{}", views::results::render_result(&result, &test));
                        }
                        return input.navigate().await;
                    }
                    Phase::Submitting { failed: true } => {
                        // Reported here only for the automatic submission.
                        if snapshot.remaining_secs == 0 {
                            println!(
                                "Time is up but the submission failed: {}. Type 'f' to retry.",
                                snapshot.last_error.as_deref().unwrap_or("unknown error")
                            );
                        }
                    }
                    Phase::Running => {
                        let remaining = snapshot.remaining_secs;
                        if remaining != last_shown
                            && (remaining % 60 == 0 || remaining == TIME_WARNING_SECONDS || remaining <= 10)
                        {
                            println!("time left: {}", format_time(remaining as u64));
                        }
                        last_shown = remaining;
                    }
                    Phase::NotStarted | Phase::Submitting { failed: false } => {}
                }
            }
        }
    }
}

async fn playground(
    state: &AppState,
    input: &mut Input,
    file: Option<&std::path::Path>,
) -> Result<Next, ClientError> {
    match state.api.compiler_status().await {
        Ok(status) => println!("{}", views::playground::render_status(&status)),
        Err(e) => println!("Execution service unreachable: {}", e.message()),
    }

    let mut pad = Playground::default();
    if let Some(path) = file {
        pad.open(path)?;
        show_run(pad.run(&state.api).await);
    } else {
        println!("{}", pad.code);
    }

    loop {
        let Some(line) = input
            .prompt("\n[run] [edit] [clear] [show] [examples] [load n] [save [file]] [open file] or a path> ")
            .await?
        else {
            return Ok(None);
        };

        match PlaygroundCommand::parse(&line) {
            Some(PlaygroundCommand::Run) => show_run(pad.run(&state.api).await),
            Some(PlaygroundCommand::Edit) => {
                println!("Type your code, finish with a line containing only '.'");
                let mut code = String::new();
                while let Some(line) = input.lines.next_line().await? {
                    if line.trim() == "." {
                        break;
                    }
                    code.push_str(&line);
                    code.push('\n');
                }
                pad.set_code(code);
            }
            Some(PlaygroundCommand::Clear) => {
                pad.clear();
                println!("Code cleared.");
            }
            Some(PlaygroundCommand::Show) => println!("{}", pad.code),
            Some(PlaygroundCommand::Examples) => print!("{}", views::playground::render_examples()),
            Some(PlaygroundCommand::Load(index)) => {
                if let Some(example) = pad.load_example(index) {
                    println!("Loaded \"{}\"\n{}", example.name, pad.code);
                }
            }
            Some(PlaygroundCommand::Save(path)) => match pad.save(path.as_deref()) {
                Ok(written) => println!("Saved to {}", written.display()),
                Err(e) => println!("{}", e),
            },
            Some(PlaygroundCommand::Open(path)) => match pad.open(&path) {
                Ok(()) => println!("{}", pad.code),
                Err(e) => println!("{}", e),
            },
            Some(PlaygroundCommand::Leave(next)) => return Ok(next),
            None => println!("Unknown command"),
        }
    }
}

fn show_run(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Output(out) => println!("--- output ---\n{}", out),
        RunOutcome::Failed(err) => println!("--- error ---\n{}", err),
    }
}

async fn login(state: &AppState, input: &mut Input) -> Result<Next, ClientError> {
    let Some(username) = input.prompt("username> ").await? else {
        return Ok(None);
    };
    let Some(password) = input.prompt("password> ").await? else {
        return Ok(None);
    };

    match views::auth::login(&state.api, &state.session, &LoginRequest { username, password }).await {
        Ok(route) => Ok(Some(route.path())),
        Err(e) => {
            println!("Login failed: {}", e.message());
            input.navigate().await
        }
    }
}

async fn register(state: &AppState, input: &mut Input) -> Result<Next, ClientError> {
    let mut fields = Vec::new();
    for label in ["username> ", "email> ", "password> ", "confirm password> "] {
        match input.prompt(label).await? {
            Some(value) => fields.push(value),
            None => return Ok(None),
        }
    }
    let [username, email, password, confirm_password] = <[String; 4]>::try_from(fields)
        .map_err(|_| ClientError::Validation("missing registration field".to_string()))?;

    let req = RegisterRequest {
        username,
        email,
        password,
        confirm_password,
    };
    match views::auth::register(&state.api, &state.session, &req).await {
        Ok(route) => Ok(Some(route.path())),
        Err(e) => {
            println!("Registration failed: {}", e.message());
            input.navigate().await
        }
    }
}

async fn admin(state: &AppState, input: &mut Input) -> Result<Next, ClientError> {
    loop {
        let dashboard = views::admin::load_dashboard(&state.api).await;
        print!("{}", views::admin::render_dashboard(&dashboard));
        println!(
            "\nCommands: promote|demote|ban|unban <user id>, delete-lecture <id>, \
             delete-question <id>, new-lecture, new-test, refresh, or a path"
        );

        let Some(line) = input.prompt("admin> ").await? else {
            return Ok(None);
        };
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let id = parts.next().and_then(|v| v.parse::<i64>().ok());

        let outcome = match (command, id) {
            ("promote", Some(id)) => moderate(state, id, UserAction::Promote).await,
            ("demote", Some(id)) => moderate(state, id, UserAction::Demote).await,
            ("ban", Some(id)) => moderate(state, id, UserAction::Ban).await,
            ("unban", Some(id)) => moderate(state, id, UserAction::Unban).await,
            ("delete-lecture", Some(id)) => state.api.delete_lecture(id).await,
            ("delete-question", Some(id)) => state.api.delete_question(id).await,
            ("new-lecture", _) => new_lecture(state, input).await,
            ("new-test", _) => new_test(state, input).await,
            ("refresh", _) => Ok(()),
            ("", _) | ("q", _) => return Ok(None),
            (path, _) if path.starts_with('/') => return Ok(Some(path.to_string())),
            _ => {
                println!("Unknown command: {}", line);
                Ok(())
            }
        };

        if let Err(e) = outcome {
            println!("Error: {}", e.message());
        }
    }
}

async fn moderate(state: &AppState, id: i64, action: UserAction) -> Result<(), ClientError> {
    let user = state.api.moderate_user(id, action).await?;
    println!("{} updated", user.username);
    Ok(())
}

async fn ask(input: &mut Input, label: &str) -> Result<String, ClientError> {
    input
        .prompt(label)
        .await?
        .ok_or_else(|| ClientError::Validation("input closed".to_string()))
}

async fn new_lecture(state: &AppState, input: &mut Input) -> Result<(), ClientError> {
    let req = CreateLectureRequest {
        title: ask(input, "title> ").await?,
        description: ask(input, "description> ").await?,
        content: ask(input, "content (markdown, one line)> ").await?,
        order: ask(input, "order> ").await?.parse().unwrap_or(0),
    };
    let lecture = state.api.create_lecture(&req).await?;
    println!("Created lecture {}", lecture.id);
    Ok(())
}

async fn new_test(state: &AppState, input: &mut Input) -> Result<(), ClientError> {
    let mut req = CreateTestRequest::new(ask(input, "title> ").await?);
    req.description = ask(input, "description> ").await?;
    req.time_limit = ask(input, "time limit (min) [30]> ")
        .await?
        .parse()
        .unwrap_or(req.time_limit);
    req.passing_score = ask(input, "passing score (%) [70]> ")
        .await?
        .parse()
        .unwrap_or(req.passing_score);

    println!("Questions (empty text to finish)");
    loop {
        let text = ask(input, "question> ").await?;
        if text.is_empty() {
            break;
        }
        let a = ask(input, "  A> ").await?;
        let b = ask(input, "  B> ").await?;
        let c = ask(input, "  C> ").await?;
        let d = ask(input, "  D> ").await?;
        let correct: OptionLabel = ask(input, "  correct (A-D)> ").await?.parse()?;
        let mut question = NewQuestion::new(text, correct).with_options(&a, &b, &c, &d);
        question.explanation = ask(input, "  explanation> ").await?;
        req.questions.push(question);
    }

    let test: Test = state.api.create_test(&req).await?;
    println!("Created test {} with {} question(s)", test.id, req.questions.len());
    Ok(())
}
