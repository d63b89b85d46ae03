use crate::infra::{demo_catalog, load_catalog, Catalog, CatalogSource};
use admit_advisor::config::AppConfig;
use admit_advisor::error::AppError;
use admit_advisor::workflows::admission::{
    AdvisorSettings, RankedRecommendation, RecommendationRequest, RecommendationService,
    StudentProfile, Tier, TieredRecommendations,
};
use clap::Args;
use std::fmt::Write;
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_SCORE: u32 = 640;
const DEMO_RANK: u32 = 12000;
const DEMO_PROVINCE: &str = "Zhejiang";
const DEMO_SUBJECT: &str = "Physics";
const DEMO_YEAR: u16 = 2025;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Current-year inventory CSV (defaults to the built-in sample)
    #[arg(long, requires = "history")]
    pub(crate) inventory: Option<PathBuf>,
    /// Historical admission outcomes CSV (defaults to the built-in sample)
    #[arg(long, requires = "inventory")]
    pub(crate) history: Option<PathBuf>,
    /// Student exam score
    #[arg(long)]
    pub(crate) score: u32,
    /// Student province-wide rank
    #[arg(long)]
    pub(crate) rank: Option<u32>,
    /// Student home province
    #[arg(long)]
    pub(crate) province: String,
    /// Exam subject category
    #[arg(long)]
    pub(crate) subject: String,
    /// Admission year being planned for
    #[arg(long)]
    pub(crate) year: u16,
    /// Keep only majors whose name or category contains this keyword (repeatable)
    #[arg(long = "major")]
    pub(crate) majors: Vec<String>,
    /// Prefer institutions in this province when ranking (repeatable)
    #[arg(long = "prefer-province")]
    pub(crate) preferred_provinces: Vec<String>,
    /// Override the number of rush picks
    #[arg(long)]
    pub(crate) rush: Option<usize>,
    /// Override the number of stable picks
    #[arg(long)]
    pub(crate) stable: Option<usize>,
    /// Override the number of safe picks
    #[arg(long)]
    pub(crate) safe: Option<usize>,
    /// Print the full result as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Student exam score for the demo profile
    #[arg(long)]
    pub(crate) score: Option<u32>,
    /// Student rank for the demo profile
    #[arg(long)]
    pub(crate) rank: Option<u32>,
    /// Print the full result as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog = load_catalog(args.inventory.as_deref(), args.history.as_deref())?;

    let mut request = RecommendationRequest::for_student(StudentProfile {
        score: args.score,
        rank: args.rank,
        province: args.province,
        subject_category: args.subject,
        target_year: args.year,
    });
    request.filters.major_keywords = args.majors;
    request.preferences.preferred_provinces = args.preferred_provinces;
    request.rush_count = args.rush;
    request.stable_count = args.stable;
    request.safe_count = args.safe;

    let source = catalog.source;
    let recommendations = recommend(catalog, config.advisor.settings(), &request)?;
    emit(&request.student, source, &recommendations, args.json)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let catalog = demo_catalog()?;
    let request = RecommendationRequest::for_student(demo_student(args.score, args.rank));

    if !args.json {
        println!("Admission advisor demo");
    }
    let source = catalog.source;
    let recommendations = recommend(catalog, AdvisorSettings::default(), &request)?;
    emit(&request.student, source, &recommendations, args.json)
}

fn demo_student(score: Option<u32>, rank: Option<u32>) -> StudentProfile {
    StudentProfile {
        score: score.unwrap_or(DEMO_SCORE),
        rank: rank.or(Some(DEMO_RANK)),
        province: DEMO_PROVINCE.to_string(),
        subject_category: DEMO_SUBJECT.to_string(),
        target_year: DEMO_YEAR,
    }
}

fn recommend(
    catalog: Catalog,
    settings: AdvisorSettings,
    request: &RecommendationRequest,
) -> Result<TieredRecommendations, AppError> {
    let service = RecommendationService::new(
        Arc::new(catalog.inventory),
        Arc::new(catalog.history),
        settings,
    );
    Ok(service.recommend(request)?)
}

fn emit(
    student: &StudentProfile,
    source: CatalogSource,
    recommendations: &TieredRecommendations,
    json: bool,
) -> Result<(), AppError> {
    if json {
        println!("{}", serde_json::to_string_pretty(recommendations)?);
    } else {
        print!("{}", render_report(student, source, recommendations));
    }
    Ok(())
}

pub(crate) fn render_report(
    student: &StudentProfile,
    source: CatalogSource,
    recommendations: &TieredRecommendations,
) -> String {
    let mut out = String::new();
    let diagnostics = &recommendations.diagnostics;

    let rank = student
        .rank
        .map(|rank| format!(" (rank {rank})"))
        .unwrap_or_default();
    let _ = writeln!(
        out,
        "Student: score {}{}, {} / {}, {}",
        student.score, rank, student.province, student.subject_category, student.target_year
    );
    let _ = writeln!(
        out,
        "Catalog: {} | {} groups evaluated | {} without history | {} filtered",
        source.label(),
        diagnostics.candidates_evaluated,
        diagnostics.without_history,
        diagnostics.filtered.len()
    );
    let _ = writeln!(
        out,
        "Generated {}",
        diagnostics.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    if recommendations.is_empty() {
        let _ = writeln!(out, "\nNo candidates matched this profile.");
    }

    for tier in Tier::ordered() {
        let entries = recommendations.tier(tier);
        if entries.is_empty() {
            continue;
        }
        let summary = match tier {
            Tier::Rush => &recommendations.summary.rush,
            Tier::Stable => &recommendations.summary.stable,
            Tier::Safe => &recommendations.summary.safe,
        };
        let _ = writeln!(
            out,
            "\n{} ({} picks, average {:.1}%)",
            tier.label(),
            summary.count,
            summary.average_probability
        );
        for (position, entry) in entries.iter().enumerate() {
            render_entry(&mut out, position + 1, entry);
        }
    }

    if !diagnostics.filtered.is_empty() {
        let _ = writeln!(out, "\nFiltered out");
        for entry in &diagnostics.filtered {
            let _ = writeln!(
                out,
                "- {} [{}/{}]: gap {:+.1}, {}",
                entry.institution_name,
                entry.key.institution_code,
                entry.key.group_code,
                entry.score_gap,
                entry.reason.summary()
            );
        }
    }

    out
}

fn render_entry(out: &mut String, position: usize, entry: &RankedRecommendation) {
    let group = &entry.group;
    let result = &entry.result;
    let group_name = group.group.name.as_deref().unwrap_or("unnamed group");
    let _ = writeln!(
        out,
        "{position:>3}. {} [{}/{}] {} | {:.1}% | confidence {:.0} | {} adjustment risk",
        group.institution.name,
        group.institution.code,
        group.group.code,
        group_name,
        result.probability,
        result.confidence,
        result.adjustment_risk.label()
    );

    let majors: Vec<&str> = group.majors.iter().map(|major| major.name.as_str()).collect();
    let _ = writeln!(
        out,
        "     {} majors, {} places: {}",
        group.majors.len(),
        group.total_plan_count(),
        majors.join(", ")
    );

    let reasons: Vec<&str> = entry.reasons.iter().map(|code| code.label()).collect();
    let _ = writeln!(out, "     why: {}", reasons.join("; "));
    if !entry.warnings.is_empty() {
        let warnings: Vec<&str> = entry.warnings.iter().map(|code| code.label()).collect();
        let _ = writeln!(out, "     watch: {}", warnings.join("; "));
    }
    if !entry.highlights.is_empty() {
        let highlights: Vec<&str> = entry.highlights.iter().map(|code| code.label()).collect();
        let _ = writeln!(out, "     highlights: {}", highlights.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_report_lists_every_tier() {
        let catalog = demo_catalog().expect("built-in sample parses");
        let request = RecommendationRequest::for_student(demo_student(None, None));
        let recommendations = recommend(catalog, AdvisorSettings::default(), &request)
            .expect("demo recommendation succeeds");

        let report = render_report(
            &request.student,
            CatalogSource::BuiltInSample,
            &recommendations,
        );

        assert!(report.contains("Student: score 640 (rank 12000), Zhejiang / Physics, 2025"));
        assert!(report.contains("\nRush ("));
        assert!(report.contains("\nStable ("));
        assert!(report.contains("\nSafe ("));
        assert!(report.contains("Filtered out"));
        assert!(report.contains("Peking University [10001/G01]"));
    }

    #[test]
    fn empty_result_is_reported() {
        let catalog = demo_catalog().expect("built-in sample parses");
        let mut student = demo_student(None, None);
        student.province = "Hainan".to_string();
        let request = RecommendationRequest::for_student(student);
        let recommendations = recommend(catalog, AdvisorSettings::default(), &request)
            .expect("empty scope is not an error");

        let report = render_report(
            &request.student,
            CatalogSource::BuiltInSample,
            &recommendations,
        );
        assert!(report.contains("No candidates matched this profile."));
        assert!(report.contains("0 groups evaluated"));
    }
}
