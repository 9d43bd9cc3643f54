//! The `quizflow init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create quizflow.toml
    if std::path::Path::new("quizflow.toml").exists() {
        println!("quizflow.toml already exists, skipping.");
    } else {
        std::fs::write("quizflow.toml", SAMPLE_CONFIG)?;
        println!("Created quizflow.toml");
    }

    // Create example quiz
    std::fs::create_dir_all("quizzes")?;
    let example_path = std::path::Path::new("quizzes/example.toml");
    if example_path.exists() {
        println!("quizzes/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUIZ)?;
        println!("Created quizzes/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit quizflow.toml with your quiz API URL and token");
    println!("  2. Run: quizflow validate --quiz-file quizzes/example.toml");
    println!("  3. Run: quizflow take --quiz 1 --quiz-file quizzes/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizflow configuration

base_url = "http://localhost:8080"
token = "${QUIZFLOW_TOKEN}"
timeout_secs = 30
max_retries = 2
retry_delay_ms = 500
output_dir = "./quizflow-results"

[participant]
first_name = ""
last_name = ""
"#;

const EXAMPLE_QUIZ: &str = r#"[quiz]
id = 1
title = "Example Quiz"
description = "A short quiz to get started"

[[questions]]
id = 1
position = 1
text = "Which keyword declares an immutable binding in Rust?"
multiple = false

[[questions.answers]]
id = 11
position = 1
text = "let"
correct = true

[[questions.answers]]
id = 12
position = 2
text = "var"
correct = false

[[questions.answers]]
id = 13
position = 3
text = "const mut"
correct = false

[[questions]]
id = 2
position = 2
text = "Which of these are integer types?"
multiple = true

[[questions.answers]]
id = 21
position = 1
text = "u8"
correct = true

[[questions.answers]]
id = 22
position = 2
text = "i64"
correct = true

[[questions.answers]]
id = 23
position = 3
text = "f32"
correct = false
"#;
