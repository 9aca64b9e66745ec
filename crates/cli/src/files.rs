// ABOUTME: Working-directory management: page discovery, course-name sanitizing, clear-all.
// ABOUTME: Listing pages are loose .html files; item pages follow the assignment_<id>.html convention.

use std::fs;
use std::io;
use std::path::Path;

/// Filename prefix of downloaded item pages.
pub const ITEM_PAGE_PREFIX: &str = "assignment_";

fn is_html(name: &str) -> bool {
    name.to_lowercase().ends_with(".html")
}

/// Saved listing pages in `dir`: loose `.html` files that are not
/// downloaded item pages. Sorted for a stable selection menu.
pub fn listing_pages(dir: &Path) -> io::Result<Vec<String>> {
    let mut pages = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_html(&name) && !name.starts_with(ITEM_PAGE_PREFIX) {
            pages.push(name);
        }
    }
    pages.sort();
    Ok(pages)
}

/// Already-downloaded item pages (`assignment_<id>.html`) in `dir`.
pub fn item_pages(dir: &Path) -> io::Result<Vec<String>> {
    let mut pages = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_html(&name) && name.starts_with(ITEM_PAGE_PREFIX) {
            pages.push(name);
        }
    }
    pages.sort();
    Ok(pages)
}

/// Turn a course name into a directory name: drop everything outside
/// `[\w\s-]`, then join the remaining words with underscores.
pub fn sanitize_course_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("_")
}

/// A directory holds course data when it contains our own artifacts:
/// `assignments.csv`, `course_content.json`, or any `.html` page.
fn holds_course_data(dir: &Path) -> io::Result<bool> {
    for entry in fs::read_dir(dir)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if name == "assignments.csv" || name == "course_content.json" || is_html(&name) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Delete course subdirectories, loose `.html` files, and browser
/// `*_files` support folders under `dir`. Unrelated files and
/// directories are left alone. Returns how many entries were removed.
/// The caller is responsible for confirmation.
pub fn clear_workspace(dir: &Path) -> io::Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() {
            if name.ends_with("_files") || holds_course_data(&entry.path())? {
                fs::remove_dir_all(entry.path())?;
                removed += 1;
            }
        } else if is_html(&name) {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}
