//! Interactive prompts

use anyhow::Result;
use chrono::NaiveDate;
use dialoguer::{Confirm, Input, Password, Select};

/// Date format typed at the estimated-date prompt
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Prompt for the login email.
pub fn email() -> Result<String> {
    let email: String = Input::new().with_prompt("Email").interact_text()?;
    Ok(email)
}

/// Prompt for a password (hidden input).
pub fn password() -> Result<String> {
    let password: String = Password::new().with_prompt("Password").interact()?;
    Ok(password)
}

/// Free text; may be left empty.
pub fn search(prompt: &str) -> Result<String> {
    let text: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(text)
}

/// Pick one entry; `None` when the user presses Esc.
pub fn choose(prompt: &str, items: &[String]) -> Result<Option<usize>> {
    let selection = Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()?;
    Ok(selection)
}

/// Prompt for a calendar date.
pub fn date(prompt: &str) -> Result<NaiveDate> {
    let raw: String = Input::new()
        .with_prompt(format!("{prompt} (YYYY-MM-DD)"))
        .validate_with(|input: &String| -> Result<(), String> {
            NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
                .map(|_| ())
                .map_err(|e| format!("Invalid date: {e}"))
        })
        .interact_text()?;
    Ok(NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)?)
}

/// Prompt for a quantity.
pub fn quantity(available: u32) -> Result<u32> {
    let quantity: u32 = Input::new()
        .with_prompt(format!("Quantity ({available} in stock)"))
        .default(1)
        .interact_text()?;
    Ok(quantity)
}

/// Yes/no question.
pub fn confirm(prompt: &str) -> Result<bool> {
    let answer = Confirm::new().with_prompt(prompt).default(false).interact()?;
    Ok(answer)
}
