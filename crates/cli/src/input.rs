//! Prompted stdin readers for the interactive menu.
//!
//! Each reader re-prompts until the input parses; only genuine stdin
//! failures (EOF, broken pipe) propagate as errors.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;

const DATE_FORMAT: &str = "%d/%m/%y";

pub fn read_line(prompt: &str) -> io::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    read_line_from(&mut io::stdin().lock())
}

// A zero-byte read means stdin is closed. That must become an error, or the
// re-prompting loops below would spin forever on `Ok("")`.
fn read_line_from(input: &mut impl BufRead) -> io::Result<String> {
    let mut buffer = String::new();
    if input.read_line(&mut buffer)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}

pub fn read_int(prompt: &str) -> io::Result<i64> {
    loop {
        let line = read_line(prompt)?;
        match line.trim().parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("Enter a whole number please."),
        }
    }
}

pub fn read_f64(prompt: &str) -> io::Result<f64> {
    loop {
        let line = read_line(prompt)?;
        match line.trim().parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("Enter a number please."),
        }
    }
}

pub fn read_u32(prompt: &str) -> io::Result<u32> {
    loop {
        let line = read_line(prompt)?;
        match line.trim().parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("Enter a non-negative whole number please."),
        }
    }
}

/// Reads a calendar date entered as `dd/mm/yy`.
pub fn read_date(prompt: &str) -> io::Result<NaiveDate> {
    loop {
        let line = read_line(prompt)?;
        match NaiveDate::parse_from_str(line.trim(), DATE_FORMAT) {
            Ok(date) => return Ok(date),
            Err(_) => println!("Enter a date like 13/04/23 please."),
        }
    }
}

/// Converts a user-entered index to a collection index.
///
/// Negative values are simply out of range: lookups treat them as
/// not-found rather than failing.
pub fn to_index(value: i64) -> Option<usize> {
    usize::try_from(value).ok()
}
