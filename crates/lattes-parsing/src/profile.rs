use chrono::NaiveDate;
use lattes_core::{ArticleRecord, CurriculumProfile, Section, SectionKind, TechRecord};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ParsingConfig;

/// "Última atualização do currículo em 12/03/2024".
static LAST_UPDATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)atualiza\S*\s+do\s+curr\S*\s+em\s+(\d{2})/(\d{2})/(\d{4})").unwrap()
});

/// Lines must be longer than this to be taken as the researcher's name.
const MIN_NAME_LEN: usize = 5;

/// Guess the researcher's name: the first substantial line that is not
/// generator boilerplate.
pub fn detect_name<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    detect_name_with_config(lines, &ParsingConfig::default())
}

pub(crate) fn detect_name_with_config<S: AsRef<str>>(
    lines: &[S],
    config: &ParsingConfig,
) -> Option<String> {
    let exclusions = config.name_exclusions();
    lines
        .iter()
        .map(|line| line.as_ref())
        .find(|line| {
            line.chars().count() > MIN_NAME_LEN && !exclusions.iter().any(|e| line.contains(e.as_str()))
        })
        .map(str::to_string)
}

/// The curriculum's self-reported last update date, if stated and valid.
pub fn detect_last_update<S: AsRef<str>>(lines: &[S]) -> Option<NaiveDate> {
    lines.iter().find_map(|line| {
        let caps = LAST_UPDATE_RE.captures(line.as_ref())?;
        let day = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let year = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// Collects parsed records and generic items into a [`CurriculumProfile`].
///
/// Record ids are assigned here, by position: `art-0`, `art-1`, ... and
/// `tech-0`, ... Generic items are grouped under one section per title in
/// order of first appearance.
#[derive(Debug, Default)]
pub struct ProfileAssembler {
    articles: Vec<ArticleRecord>,
    tech_products: Vec<TechRecord>,
    generic_sections: Vec<Section>,
}

impl ProfileAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_article_id(&self) -> String {
        format!("art-{}", self.articles.len())
    }

    pub fn next_tech_id(&self) -> String {
        format!("tech-{}", self.tech_products.len())
    }

    pub fn push_article(&mut self, article: ArticleRecord) {
        self.articles.push(article);
    }

    pub fn push_tech(&mut self, tech: TechRecord) {
        self.tech_products.push(tech);
    }

    pub fn push_generic(&mut self, title: &str, text: String) {
        match self.generic_sections.iter_mut().find(|s| s.title == title) {
            Some(section) => section.items.push(text),
            None => self.generic_sections.push(Section {
                title: title.to_string(),
                kind: SectionKind::Generic,
                items: vec![text],
            }),
        }
    }

    pub fn finish(self, name: String, last_update: NaiveDate) -> CurriculumProfile {
        CurriculumProfile {
            name,
            last_update,
            articles: self.articles,
            tech_products: self.tech_products,
            generic_sections: self.generic_sections,
        }
    }
}
