// ABOUTME: Interactive stdin prompting: free-form input, y/n confirmation, numbered selection.
// ABOUTME: EOF on stdin is surfaced as an error so piped runs never loop forever.

use std::io::{self, BufRead, Write};

/// Print a prompt and read one trimmed line from stdin.
pub fn input(message: &str) -> io::Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(line.trim().to_string())
}

/// Ask a y/n question; anything other than `y`/`Y` declines.
pub fn confirm(message: &str) -> io::Result<bool> {
    let answer = input(message)?;
    Ok(answer.eq_ignore_ascii_case("y"))
}

/// Ask for a 1-based choice until a valid one is entered. Returns the
/// 0-based index.
pub fn choose(message: &str, count: usize) -> io::Result<usize> {
    loop {
        let answer = input(message)?;
        match answer.parse::<usize>() {
            Ok(n) if n >= 1 && n <= count => return Ok(n - 1),
            _ => println!("Enter a number between 1 and {}.", count),
        }
    }
}
