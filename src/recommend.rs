use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::DescriptionRecord;
use crate::preprocess::tokenize;
use crate::store::records_for_user;

// category -> keywords scored against a user's aggregated description tokens
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "web-development",
        &["website", "web", "interface", "browser", "application", "layout", "design", "ui", "ux"],
    ),
    (
        "mobile-app",
        &["mobile", "app", "phone", "touch", "android", "ios", "smartphone"],
    ),
    (
        "data-science",
        &["graph", "chart", "data", "analysis", "visualization", "statistics"],
    ),
    (
        "ai-ml",
        &["artificial", "intelligence", "machine", "learning", "neural", "model"],
    ),
    (
        "game-development",
        &["game", "gaming", "3d", "unity", "character", "animation"],
    ),
    (
        "cybersecurity",
        &["security", "protection", "encryption", "cyber", "authentication"],
    ),
];

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Project {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub difficulty: &'static str,
    pub skills: &'static [&'static str],
    pub category: &'static str,
}

const PROJECTS: &[Project] = &[
    Project {
        id: "web-1",
        name: "Portfolio Website Builder",
        description: "Create a personal portfolio website using React and Next.js",
        difficulty: "Intermediate",
        skills: &["React", "Next.js", "Tailwind CSS"],
        category: "web-development",
    },
    Project {
        id: "web-2",
        name: "E-commerce Platform",
        description: "Build an online store with shopping cart functionality",
        difficulty: "Advanced",
        skills: &["Node.js", "Express", "MongoDB"],
        category: "web-development",
    },
    Project {
        id: "mobile-1",
        name: "Fitness Tracking App",
        description: "Develop a mobile app for tracking workouts and health metrics",
        difficulty: "Intermediate",
        skills: &["React Native", "Firebase"],
        category: "mobile-app",
    },
    Project {
        id: "data-1",
        name: "Data Visualization Dashboard",
        description: "Create interactive data visualizations using D3.js",
        difficulty: "Advanced",
        skills: &["D3.js", "Python", "pandas"],
        category: "data-science",
    },
    Project {
        id: "ai-1",
        name: "Image Classifier",
        description: "Train and deploy a small image classification model",
        difficulty: "Intermediate",
        skills: &["Python", "PyTorch"],
        category: "ai-ml",
    },
    Project {
        id: "game-1",
        name: "2D Platformer",
        description: "Build a simple 2D platformer with physics and animations",
        difficulty: "Beginner",
        skills: &["Unity", "C#"],
        category: "game-development",
    },
    Project {
        id: "sec-1",
        name: "Password Vault",
        description: "Implement an encrypted local password manager",
        difficulty: "Intermediate",
        skills: &["Cryptography", "CLI design"],
        category: "cybersecurity",
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct CategoryScore {
    pub category: String,
    pub score: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    pub categories: Vec<CategoryScore>,
    pub projects: Vec<Project>,
}

/// Score the fixed project categories against one user's accumulated
/// descriptions and return the top three positive matches with their
/// catalog projects. A keyword counts once per token containing it.
pub fn recommend_projects(
    records: &[DescriptionRecord],
    user: &str,
) -> Result<Recommendations> {
    let user_records = records_for_user(records, user);
    if user_records.is_empty() {
        return Err(Error::NoData {
            scope: format!("user `{user}`"),
        });
    }

    let text = user_records
        .iter()
        .map(|record| record.description.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let tokens = tokenize(&text);
    debug!("Scoring categories for {} - tokens={}", user, tokens.len());

    let mut scores: Vec<CategoryScore> = CATEGORY_KEYWORDS
        .iter()
        .map(|(category, keywords)| {
            let score = keywords
                .iter()
                .map(|keyword| tokens.iter().filter(|token| token.contains(keyword)).count())
                .sum();
            CategoryScore {
                category: category.to_string(),
                score,
            }
        })
        .collect();

    scores.sort_by(|a, b| b.score.cmp(&a.score));
    let categories: Vec<CategoryScore> = scores
        .into_iter()
        .filter(|entry| entry.score > 0)
        .take(3)
        .collect();

    let projects: Vec<Project> = categories
        .iter()
        .flat_map(|entry| {
            PROJECTS
                .iter()
                .filter(|project| project.category == entry.category)
                .copied()
        })
        .collect();

    Ok(Recommendations { categories, projects })
}
