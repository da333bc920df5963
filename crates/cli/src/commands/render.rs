//! Human-readable output.

use coursepilot_core::{CourseCode, Diagnostic, Plan};
use coursepilot_engine::{EligibilityResult, RemainingCourse};

pub fn eligibility(result: &EligibilityResult) {
    println!("🎓 {}", result.major_id);

    if result.remaining_by_bucket.is_empty() {
        println!("  (no requirement buckets)");
    }
    for bucket in &result.remaining_by_bucket {
        println!(
            "\n  [{}] choose {} — {} remaining",
            bucket.id,
            bucket.choose,
            bucket.remaining.len()
        );
        for course in &bucket.remaining {
            println!("    {}", course_line(course));
        }
    }

    println!();
    if result.eligible_now.is_empty() {
        println!("  Eligible now: none");
    } else {
        println!("  Eligible now: {}", join_codes(&result.eligible_now));
    }
    diagnostics(&result.warnings);
}

fn course_line(course: &RemainingCourse) -> String {
    let mark = if course.eligible { "✅" } else { "⏳" };
    let mut line = format!("{mark} {} ({} cr)", course.code, course.credits);
    if let Some(title) = &course.title {
        line.push_str(&format!(" {title}"));
    }
    if !course.missing_prereqs.is_empty() {
        line.push_str(&format!(" needs {}", groups(&course.missing_prereqs)));
    }
    if !course.unmet_coreqs.is_empty() {
        line.push_str(&format!(" with {}", groups(&course.unmet_coreqs)));
    }
    if course.degraded {
        line.push_str(" [defaults]");
    }
    line
}

/// `[[A], [B, C]]` as `A and (B or C)`.
fn groups(groups: &[Vec<CourseCode>]) -> String {
    groups
        .iter()
        .map(|options| {
            let text = options
                .iter()
                .map(CourseCode::as_str)
                .collect::<Vec<_>>()
                .join(" or ");
            if options.len() > 1 {
                format!("({text})")
            } else {
                text
            }
        })
        .collect::<Vec<_>>()
        .join(" and ")
}

fn join_codes(codes: &[CourseCode]) -> String {
    codes
        .iter()
        .map(CourseCode::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn plans(plans: &[Plan]) {
    for (i, plan) in plans.iter().enumerate() {
        println!(
            "\n📅 Plan {} — {} credits, score {}",
            i + 1,
            plan.credits,
            plan.score
        );
        if plan.is_empty() {
            println!("    (no sections)");
        }
        for section in &plan.sections {
            println!(
                "    {:<9} {:<6} {:<12} {}-{}  {:<7} {} cr",
                section.course.as_str(),
                section.crn,
                section.days_label(),
                section.start.format("%H:%M"),
                section.end.format("%H:%M"),
                section.campus,
                section.credits
            );
        }
    }
}

pub fn diagnostics(diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }
    println!();
    for diagnostic in diagnostics {
        println!("  ⚠️  {diagnostic}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_render_as_and_of_or() {
        let text = groups(&[
            vec![CourseCode::new("COP3337")],
            vec![CourseCode::new("COT3100"), CourseCode::new("MAD2104")],
        ]);
        assert_eq!(text, "COP3337 and (COT3100 or MAD2104)");
    }

    #[test]
    fn course_line_marks_eligibility() {
        let course = RemainingCourse {
            code: CourseCode::new("COP3530"),
            title: Some("Data Structures".into()),
            credits: 3,
            eligible: false,
            missing_prereqs: vec![vec![CourseCode::new("COP3337")]],
            coreqs: Default::default(),
            unmet_coreqs: Vec::new(),
            degraded: false,
        };
        let line = course_line(&course);
        assert!(line.contains("COP3530"));
        assert!(line.contains("needs COP3337"));
        assert!(line.starts_with("⏳"));
    }
}
