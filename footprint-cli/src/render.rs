//! Terminal rendering of reports and registries

use std::fmt::Write;

use footprint_core::{Registry, Report};

const BAR: char = '█';

fn column_width<'a, I: Iterator<Item = &'a str>>(values: I, header: &str) -> usize {
    values
        .map(|v| v.chars().count())
        .chain(std::iter::once(header.len()))
        .max()
        .unwrap_or(0)
}

/// Human-readable report
pub fn report(report: &Report) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "🔍 Results for '{}': {} of {} platforms",
        report.subject,
        report.profile_count(),
        report.registry_size
    );

    if report.profiles_found.is_empty() {
        let _ = writeln!(out, "   (no profiles found)");
    } else {
        let profiles = &report.profiles_found;
        let site_w = column_width(profiles.iter().map(|p| p.platform.as_str()), "Site");
        let cat_w = column_width(profiles.iter().map(|p| p.category.as_str()), "Category");

        let _ = writeln!(
            out,
            "   {:<site_w$}  {:<cat_w$}  Profile Link",
            "Site", "Category"
        );
        for profile in profiles {
            let _ = writeln!(
                out,
                "   {:<site_w$}  {:<cat_w$}  {}",
                profile.platform, profile.category, profile.resolved_url
            );
        }

        let _ = writeln!(out, "\n📊 Platform category distribution");
        let distribution = report.category_distribution();
        let label_w = column_width(distribution.keys().copied(), "");
        for (category, count) in &distribution {
            let bar: String = std::iter::repeat(BAR).take(*count).collect();
            let _ = writeln!(out, "   {:<label_w$}  {} {}", category, bar, count);
        }

        let _ = writeln!(out, "\n🕒 Discovery order");
        for (position, platform) in report.timeline().iter().enumerate() {
            let _ = writeln!(out, "   {}. {}", position + 1, platform);
        }
    }

    let signals = &report.signals;
    let similarity = match signals.cross_profile_similarity.value() {
        Some(score) => format!("{:.2}", score),
        None => "not computable".to_string(),
    };

    let _ = writeln!(out, "\n✍️  Writing style ({} excerpts)", signals.excerpt_count);
    let _ = writeln!(out, "   Consistency:        {}", signals.consistency_tier);
    let _ = writeln!(out, "   Style:              {}", signals.communication_style);
    let _ = writeln!(out, "   Complexity:         {}", signals.complexity_tier);
    let _ = writeln!(out, "   Vocabulary:         {:.2}", signals.vocabulary_richness);
    let _ = writeln!(out, "   Sentence length:    {:.1}", signals.average_sentence_length);
    let _ = writeln!(out, "   Profile similarity: {}", similarity);

    let _ = writeln!(out, "\n🧠 Assessment");
    let _ = writeln!(
        out,
        "   Confidence: {:.2} | Risk: {}",
        report.confidence_score, report.risk_tier
    );
    if !report.inferred_interests.is_empty() {
        let interests: Vec<&str> = report
            .inferred_interests
            .iter()
            .map(String::as_str)
            .collect();
        let _ = writeln!(out, "   Interests:  {}", interests.join(", "));
    }
    let _ = writeln!(out, "\n{}", report.narrative);

    out
}

/// Registry listing grouped by category
pub fn registry(registry: &Registry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📚 {} platforms", registry.len());

    for (category, count) in registry.categories() {
        let _ = writeln!(out, "\n{} ({})", category, count);
        for platform in registry.iter().filter(|p| p.category == category) {
            let _ = writeln!(out, "   {:<20} {}", platform.name, platform.url_template);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use footprint_core::{AnalysisConfig, PlatformDescriptor, ProbeResult, ReportBuilder, SignalSet};

    fn sample_report() -> Report {
        let config = AnalysisConfig::default();
        let github = PlatformDescriptor::new("GitHub", "Coding", "https://github.com/{}");
        let gitlab = PlatformDescriptor::new("GitLab", "Coding", "https://gitlab.com/{}");
        let profiles = vec![
            ProbeResult::new(&gitlab, gitlab.resolve("jdoe"), true),
            ProbeResult::new(&github, github.resolve("jdoe"), true),
        ];
        ReportBuilder::new(&config)
            .build("jdoe", 10, profiles, SignalSet::insufficient())
    }

    #[test]
    fn test_report_lists_profiles_in_discovery_order() {
        let text = report(&sample_report());

        assert!(text.contains("2 of 10 platforms"));
        assert!(text.contains("https://github.com/jdoe"));
        let gitlab = text.find("1. GitLab").unwrap();
        let github = text.find("2. GitHub").unwrap();
        assert!(gitlab < github);
        assert!(text.contains("Coding  ██ 2"));
        assert!(text.contains("Profile similarity: not computable"));
        assert!(text.contains("Style:              Unknown"));
    }

    #[test]
    fn test_empty_report_rendering() {
        let config = AnalysisConfig::default();
        let empty = ReportBuilder::new(&config).empty("ghost", 4);
        let text = report(&empty);

        assert!(text.contains("(no profiles found)"));
        assert!(text.contains("No public accounts were found"));
    }

    #[test]
    fn test_registry_listing() {
        let registry = Registry::embedded().unwrap();
        let text = super::registry(&registry);
        assert!(text.contains("GitHub"));
        assert!(text.contains("Coding ("));
    }
}
