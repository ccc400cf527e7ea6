//! Simple test for OpenAiBrain chat completion.
//!
//! Run with: cargo run -p openai-brain --example test_chat
//! Or with a custom message: cargo run -p openai-brain --example test_chat -- "Hoy estoy cansado"
//!
//! Make sure to set environment variables in .env:
//!   OPENAI_API_KEY - API key for authentication

use openai_brain::{ChatMessage, ChatModel, CompletionOptions, OpenAiBrain};
use std::env;

const PERSONA: &str = "Eres Auri, una acompañante emocional breve y cálida.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    let message_text = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        "Hola, ¿cómo estás?".to_string()
    };

    let brain = OpenAiBrain::from_env()?;
    println!("Brain initialized: {}", brain.name());
    println!("Model: {}", brain.config().model);

    let messages = vec![
        ChatMessage::system(PERSONA),
        ChatMessage::user(message_text.clone()),
    ];

    println!("\nSending: \"{}\"", message_text);
    let reply = brain.complete(messages, CompletionOptions::default()).await?;
    println!("\nReply:\n{}", reply);

    Ok(())
}
