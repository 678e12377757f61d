//! Markdown renderings stored in the audit artifact and returned to the UI.

use std::fmt::Write;

use crate::assessment::disagreement::DisagreementReport;
use crate::assessment::models::{AssessmentResult, AssessorConfig};
use crate::assessment::scoring::ScoreCard;

pub fn render_assessor_report(
    candidate_name: &str,
    assessor: &AssessorConfig,
    result: &AssessmentResult,
    scorecard: &ScoreCard,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Assessment: {candidate_name}");
    let _ = writeln!(out, "Assessor: {}\n", assessor.label());
    let _ = writeln!(
        out,
        "**Recommendation:** {}  \n**Overall:** {}/100 (skills {}/100, exercise {}/100)\n",
        result.recommendation.label(),
        scorecard.overall_score,
        scorecard.skills_score,
        scorecard.exercise_score
    );

    if !result.summary.is_empty() {
        out.push_str("## Summary\n");
        for point in &result.summary {
            let _ = writeln!(out, "- {point}");
        }
        out.push('\n');
    }

    out.push_str("## Skills\n");
    out.push_str("| Skill | Score | Confidence | Rationale |\n|---|---|---|---|\n");
    for s in &result.skill_scores {
        let _ = writeln!(
            out,
            "| {} | {}/9 | {:?} | {} |",
            escape_cell(&s.skill),
            s.score,
            s.confidence,
            escape_cell(&s.rationale)
        );
    }
    out.push('\n');

    for s in &result.skill_scores {
        let _ = writeln!(out, "### {}", s.skill);
        let _ = writeln!(out, "Gap to next level: {}", s.gap_to_next_level);
        write_list(&mut out, "Evidence", &s.evidence);
        write_list(&mut out, "Risks", &s.risks);
        write_list(&mut out, "Follow-ups", &s.followups);
        out.push('\n');
    }

    out.push_str("## Exercise\n");
    let _ = writeln!(out, "Score: {}/9\n", result.exercise_score);
    let _ = writeln!(out, "{}", result.exercise_rationale);
    write_list(&mut out, "Evidence", &result.exercise_evidence);
    out
}

/// One row per skill, one column per assessor, biggest spread first.
pub fn render_disagreement_table(
    report: &DisagreementReport,
    assessors: &[AssessorConfig],
) -> String {
    let mut out = String::from("| Skill |");
    for a in assessors {
        let _ = write!(out, " {} |", escape_cell(&a.label()));
    }
    out.push_str(" Min | Max | Spread |\n|---|");
    out.push_str(&"---|".repeat(assessors.len() + 3));
    out.push('\n');

    for row in &report.rows {
        let _ = write!(out, "| {} |", escape_cell(&row.skill));
        for score in &row.scores {
            let _ = write!(out, " {score} |");
        }
        let _ = writeln!(out, " {} | {} | {} |", row.min, row.max, row.spread);
    }
    out
}

fn write_list(out: &mut String, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{title}:");
    for item in items {
        let _ = writeln!(out, "- {item}");
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::disagreement::analyze_disagreement;
    use crate::assessment::models::{Recommendation, SkillScore, Stance};
    use crate::assessment::normalizer::default_skill_score;

    fn result(score: u8) -> AssessmentResult {
        AssessmentResult {
            recommendation: Recommendation::Hire,
            skill_scores: vec![SkillScore {
                score,
                rationale: "Used a | pipe".to_string(),
                ..default_skill_score("Rust", Stance::Strict)
            }],
            exercise_score: 6,
            exercise_rationale: "Solid.".to_string(),
            exercise_evidence: vec!["Validated output".to_string()],
            summary: vec!["Good depth".to_string()],
        }
    }

    fn assessor(model: &str) -> AssessorConfig {
        AssessorConfig {
            model: model.to_string(),
            stance: Stance::Strict,
        }
    }

    #[test]
    fn test_assessor_report_contains_scores_and_escapes_cells() {
        let card = ScoreCard {
            skills_score: 63,
            exercise_score: 63,
            overall_score: 63,
        };
        let report = render_assessor_report("Ada", &assessor("m1"), &result(6), &card);
        assert!(report.contains("# Assessment: Ada"));
        assert!(report.contains("**Recommendation:** Hire"));
        assert!(report.contains("| Rust | 6/9 | Low | Used a \\| pipe |"));
        assert!(report.contains("- Good depth"));
    }

    #[test]
    fn test_disagreement_table_has_one_column_per_assessor() {
        let results = vec![result(2), result(8)];
        let table = render_disagreement_table(
            &analyze_disagreement(&results),
            &[assessor("m1"), assessor("m2")],
        );
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "| Skill | m1 (strict) | m2 (strict) | Min | Max | Spread |");
        assert_eq!(lines[1], "|---|---|---|---|---|---|");
        assert_eq!(lines[2], "| Rust | 2 | 8 | 2 | 8 | 6 |");
    }
}
