// ABOUTME: Interactive CLI workflow: pick a saved listing page, extract items, download
// ABOUTME: and parse each assignment page, and write assignments.csv + course_content.json.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use scraper::Html;

use coursegrab_extract::{extract_fields, extract_items, CourseContent, Session, SESSION_COOKIE};

mod csv;
mod export;
mod files;
mod prompt;

#[derive(Parser, Debug)]
#[command(name = "coursegrab")]
#[command(about = "Extract assignments from saved Canvas course pages")]
struct Args {
    /// Working directory holding saved course pages
    #[arg(long, default_value = "courses")]
    dir: PathBuf,

    /// Delete all downloaded course data and exit
    #[arg(short = 'c', long = "clear")]
    clear: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    if args.clear {
        return clear(&args.dir);
    }

    println!("coursegrab - Canvas course content downloader");
    println!("{}", "=".repeat(50));
    println!();
    println!("Instructions:");
    println!("1. Save your Canvas assignments/modules/grades page as HTML");
    println!("2. Put it in the '{}' directory", args.dir.display());
    println!("3. Assignments are extracted and downloaded from there");
    println!();

    fs::create_dir_all(&args.dir)
        .with_context(|| format!("creating directory {}", args.dir.display()))?;

    let pages = files::listing_pages(&args.dir)?;
    if pages.is_empty() {
        eprintln!("Error: no HTML files found in '{}'.", args.dir.display());
        eprintln!("Save the assignments/modules page as HTML first.");
        return Ok(ExitCode::from(1));
    }

    let source_file = if pages.len() == 1 {
        println!("Found HTML file: {}", pages[0]);
        pages[0].clone()
    } else {
        println!("Multiple HTML files found. Select the assignments/modules page:");
        for (i, name) in pages.iter().enumerate() {
            println!("{}. {}", i + 1, name);
        }
        let index = prompt::choose("Select file number: ", pages.len())?;
        pages[index].clone()
    };
    let source_path = args.dir.join(&source_file);

    println!();
    println!("Parsing assignments list...");
    let html = fs::read_to_string(&source_path)
        .with_context(|| format!("reading {}", source_path.display()))?;
    let listing = extract_items(&Html::parse_document(&html), Some(&source_file));
    tracing::debug!(
        course = %listing.course_name,
        items = listing.items.len(),
        "parsed listing page"
    );

    let safe_name = files::sanitize_course_name(&listing.course_name);
    let course_dir = args.dir.join(&safe_name);
    if !course_dir.exists() {
        fs::create_dir_all(&course_dir)?;
        println!("Created course directory: {}/", safe_name);
    }
    fs::rename(&source_path, course_dir.join(&source_file))
        .with_context(|| format!("moving {} into {}/", source_file, safe_name))?;

    if listing.items.is_empty() {
        println!("No assignments found in the HTML file.");
        return Ok(ExitCode::SUCCESS);
    }

    println!("Course: {}", listing.course_name);
    println!("Found {} assignments", listing.items.len());

    export::write_items_csv(&course_dir.join("assignments.csv"), &listing.items)?;
    println!();
    println!("Created {}/assignments.csv", safe_name);

    let existing = files::item_pages(&course_dir)?;
    let download_mode = if existing.is_empty() {
        true
    } else {
        println!();
        println!("Found {} existing assignment HTML files", existing.len());
        !prompt::confirm("Parse existing files? (y/n): ")?
    };

    let session = if download_mode {
        println!();
        println!("Do you want to download all assignment pages?");
        println!("Note: authenticated Canvas sites need a session cookie.");
        if !prompt::confirm("Download assignments? (y/n): ")? {
            println!("Skipping download. Save assignment pages manually and re-run.");
            return Ok(ExitCode::SUCCESS);
        }

        println!();
        println!("For authenticated sites, paste the '{}' cookie value", SESSION_COOKIE);
        println!("(browser devtools > Application/Storage > Cookies).");
        let value = prompt::input("Cookie value (or press Enter to try without): ")?;
        let cookie = if value.is_empty() { None } else { Some(value) };
        Some(Session::builder().cookie(cookie).build()?)
    } else {
        None
    };

    println!();
    if download_mode {
        println!("Downloading {} assignments...", listing.items.len());
    } else {
        println!("Parsing {} existing assignment files...", existing.len());
    }

    let total = listing.items.len();
    let mut assignments = Vec::new();

    for (i, item) in listing.items.iter().enumerate() {
        println!("[{}/{}] {}", i + 1, total, item.title);
        let page_name = format!("{}{}.html", files::ITEM_PAGE_PREFIX, item.id);
        let page_path = course_dir.join(&page_name);

        if download_mode {
            if page_path.exists() {
                // Idempotent: a page on disk is reused, never re-fetched.
                println!("  already exists: {}", page_name);
            } else if let Some(session) = &session {
                match session.download_to(&item.url, &page_path) {
                    Ok(()) => println!("  downloaded: {}", page_name),
                    Err(err) => {
                        println!("  failed to download: {}", err);
                        continue;
                    }
                }
            }
        }

        if page_path.exists() {
            let page_html = fs::read_to_string(&page_path)
                .with_context(|| format!("reading {}", page_path.display()))?;
            let record = extract_fields(&Html::parse_document(&page_html)).merge_listing(item);
            assignments.push(record);
        } else {
            println!("  file not found: {}", page_name);
        }
    }

    let processed = assignments.len();
    export::write_course_json(
        &course_dir.join("course_content.json"),
        &CourseContent {
            course_name: listing.course_name,
            assignments,
        },
    )?;

    println!();
    println!("Created {}/course_content.json", safe_name);
    println!("Done! Processed {} assignments.", processed);
    println!("All files saved in: {}", course_dir.display());
    Ok(ExitCode::SUCCESS)
}

/// The `--clear` flow: confirm, then wipe the working directory.
fn clear(dir: &Path) -> Result<ExitCode> {
    if !dir.exists() {
        println!("Nothing to clear: '{}' does not exist.", dir.display());
        return Ok(ExitCode::SUCCESS);
    }

    println!("This deletes all course subdirectories, loose HTML files,");
    println!("and browser support folders under '{}'.", dir.display());
    if !prompt::confirm("Clear all downloaded data? (y/n): ")? {
        println!("Aborted.");
        return Ok(ExitCode::SUCCESS);
    }

    let removed = files::clear_workspace(dir)?;
    println!("Removed {} entries.", removed);
    Ok(ExitCode::SUCCESS)
}
