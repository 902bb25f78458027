use std::io::Write;

use lattes_core::{CurriculumProfile, Rating};
use lattes_parsing::TrackedItem;
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn heading(w: &mut dyn Write, title: &str, color: ColorMode) -> std::io::Result<()> {
    writeln!(w)?;
    let sep = "=".repeat(60);
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", title.bold())?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "{}", title)?;
        writeln!(w, "{}", sep)?;
    }
    Ok(())
}

fn rating_label(rating: Rating, color: ColorMode) -> String {
    let label = format!("[{}]", rating);
    if !color.enabled() {
        return label;
    }
    match rating {
        Rating::Mb => label.green().bold().to_string(),
        Rating::B => label.green().to_string(),
        Rating::R => label.yellow().to_string(),
        Rating::F => label.red().to_string(),
        Rating::I => label.dimmed().to_string(),
    }
}

/// Print the full profile report: header, articles, tech products, sections.
pub fn print_profile(
    w: &mut dyn Write,
    profile: &CurriculumProfile,
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", profile.name.bold().cyan())?;
    } else {
        writeln!(w, "{}", profile.name)?;
    }
    writeln!(w, "Last update: {}", profile.last_update.format("%d/%m/%Y"))?;

    print_articles(w, profile, color)?;
    print_tech_products(w, profile, color)?;
    print_sections(w, profile, color)?;
    print_summary(w, profile, color)?;
    Ok(())
}

fn print_articles(w: &mut dyn Write, profile: &CurriculumProfile, color: ColorMode) -> std::io::Result<()> {
    heading(w, &format!("ARTICLES ({})", profile.articles.len()), color)?;
    for article in &profile.articles {
        writeln!(
            w,
            "{} {} {}",
            rating_label(article.rating, color),
            article.year,
            article.title
        )?;
        let issn = article.issn.as_deref().unwrap_or("-");
        let detail = format!(
            "{} | ISSN {} | {} pts",
            article.journal_name, issn, article.points
        );
        if color.enabled() {
            writeln!(w, "    {}", detail.dimmed())?;
        } else {
            writeln!(w, "    {}", detail)?;
        }
        if let Some(ref doi) = article.doi {
            writeln!(w, "    DOI {}", doi)?;
        }
    }
    Ok(())
}

fn print_tech_products(
    w: &mut dyn Write,
    profile: &CurriculumProfile,
    color: ColorMode,
) -> std::io::Result<()> {
    heading(w, &format!("TECH PRODUCTS ({})", profile.tech_products.len()), color)?;
    for tech in &profile.tech_products {
        let year = if tech.year > 0 {
            tech.year.to_string()
        } else {
            "----".to_string()
        };
        writeln!(w, "{} {}", year, tech.title)?;
    }
    Ok(())
}

fn print_sections(w: &mut dyn Write, profile: &CurriculumProfile, color: ColorMode) -> std::io::Result<()> {
    heading(w, &format!("OTHER SECTIONS ({})", profile.generic_sections.len()), color)?;
    for section in &profile.generic_sections {
        writeln!(w, "{:>4}  {}", section.items.len(), section.title)?;
    }
    Ok(())
}

fn print_summary(w: &mut dyn Write, profile: &CurriculumProfile, color: ColorMode) -> std::io::Result<()> {
    heading(w, "SUMMARY", color)?;

    let matched = profile
        .articles
        .iter()
        .filter(|a| a.matched_journal_id.is_some())
        .count();
    let points: u32 = profile.articles.iter().map(|a| a.points).sum();

    writeln!(w, "  Articles: {} ({} matched in registry)", profile.articles.len(), matched)?;
    for rating in [Rating::Mb, Rating::B, Rating::R, Rating::F, Rating::I] {
        let count = profile.articles.iter().filter(|a| a.rating == rating).count();
        if count > 0 {
            writeln!(w, "    {} {}", rating_label(rating, color), count)?;
        }
    }
    if color.enabled() {
        writeln!(w, "  {} {}", "Points:".green(), points)?;
    } else {
        writeln!(w, "  Points: {}", points)?;
    }
    writeln!(w, "  Tech products: {}", profile.tech_products.len())?;
    writeln!(w)?;
    Ok(())
}

/// Print tracked items for the `sections` dry run.
pub fn print_tracked_items(
    w: &mut dyn Write,
    file_name: &str,
    items: &[TrackedItem],
    color: ColorMode,
) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(
            w,
            "{} {} ({} items tracked)\n",
            "DRY RUN:".bold().cyan(),
            file_name.bold(),
            items.len()
        )?;
    } else {
        writeln!(w, "DRY RUN: {} ({} items tracked)\n", file_name, items.len())?;
    }

    let mut current: Option<&str> = None;
    let mut index = 0;
    for item in items {
        if current != Some(item.section.as_str()) {
            current = Some(item.section.as_str());
            index = 0;
            let label = format!("{} ({:?})", item.section, item.kind);
            if color.enabled() {
                writeln!(w, "{}", label.bold().yellow())?;
            } else {
                writeln!(w, "{}", label)?;
            }
        }
        index += 1;
        let text = truncate(&item.text, 200);
        if color.enabled() {
            writeln!(w, "  [{}] {}", index, text.dimmed())?;
        } else {
            writeln!(w, "  [{}] {}", index, text)?;
        }
    }

    writeln!(w)?;
    writeln!(w, "Total: {} items", items.len())?;
    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let cut: String = s.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}
