//! Topic templates used by the fallback roadmap.

/// A keyword-matched topic and its ordered stages.
struct Template {
    keywords: &'static [&'static str],
    stages: &'static [&'static str],
}

/// Checked in order; the first template with a matching keyword wins.
const TEMPLATES: &[Template] = &[
    Template {
        keywords: &["frontend"],
        stages: &[
            "HTML, CSS & responsive design",
            "JavaScript fundamentals",
            "React.js and frontend frameworks",
            "Version control and hosting",
        ],
    },
    Template {
        keywords: &["backend"],
        stages: &[
            "Programming fundamentals (Node.js, Python)",
            "Databases & SQL",
            "Building REST APIs",
            "Authentication, testing, and deployment",
        ],
    },
    Template {
        keywords: &["youtube", "content"],
        stages: &[
            "Define your niche and audience",
            "Learn video production and editing",
            "Create and publish your first videos",
            "Optimize for growth and engagement",
            "Monetize and build your brand",
        ],
    },
    Template {
        keywords: &["ai", "ml", "data"],
        stages: &[
            "Learn Python & math fundamentals",
            "Data preprocessing and visualization",
            "Machine learning with Scikit-learn",
            "Deep learning and neural networks",
            "ML project deployment and optimization",
        ],
    },
    Template {
        keywords: &["fitness", "health"],
        stages: &[
            "Assess fitness level and set goals",
            "Learn workout fundamentals",
            "Track nutrition and sleep",
            "Progressive overload and habit building",
        ],
    },
];

const GENERIC_STAGES: &[&str] = &[
    "Understand fundamentals of the domain",
    "Study key tools and technologies",
    "Apply learning through projects",
    "Refine, iterate, and grow expertise",
];

/// Pick the stage list for a goal.
///
/// Matching is a case-insensitive substring test, so short keywords such as
/// `ai` also match inside longer words. Never returns an empty list.
pub fn stages_for(goal: &str) -> &'static [&'static str] {
    let goal = goal.to_lowercase();
    TEMPLATES
        .iter()
        .find(|t| t.keywords.iter().any(|k| goal.contains(k)))
        .map_or(GENERIC_STAGES, |t| t.stages)
}
