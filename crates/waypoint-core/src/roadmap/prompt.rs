//! Prompt construction for the generative roadmap request.

use super::availability::Availability;
use super::types::PlanRequest;

/// JSON shape the model is asked to return.
const RESPONSE_SCHEMA: &str = r#"{
  "estimated_effort_hours": <number>,
  "achievable_hours": {achievable},
  "weeks_available": {weeks},
  "milestones": [
    {
      "title": "Milestone 1: ...",
      "start_date": "YYYY-MM-DD",
      "target_date": "YYYY-MM-DD",
      "tasks": [
        {"title": "Task 1", "estimated_hours": <number>},
        {"title": "Task 2", "estimated_hours": <number>}
      ]
    }
  ]
}"#;

/// Build the single-turn prompt asking for a roadmap as strict JSON.
pub fn build_prompt(request: &PlanRequest, availability: Availability) -> String {
    let mut prompt = String::with_capacity(1536);

    prompt.push_str("You are a structured roadmap planner.\n");
    prompt.push_str(&format!(
        "The user wants to achieve the goal: \"{}\".\n",
        request.title
    ));
    if !request.description.is_empty() {
        prompt.push_str(&format!("Additional context: {}\n", request.description));
    }
    prompt.push_str(&format!(
        "They can dedicate {} hours per week for {} weeks (until {}).\n\n",
        request.hours_per_week,
        availability.weeks,
        request.deadline().format("%Y-%m-%d"),
    ));

    prompt.push_str(
        "Break this goal into 4-6 milestones with progressive skill development \
         and time-bound tasks.\n\
         Each milestone should:\n\
         - Have a descriptive title\n\
         - Contain 3-5 specific, realistic tasks with estimated hours\n\
         - Include start_date and target_date fields\n\
         - Be relevant and ordered logically\n\n",
    );

    prompt.push_str("Return a *valid JSON* strictly in this format:\n");
    prompt.push_str(
        &RESPONSE_SCHEMA
            .replace("{achievable}", &availability.achievable_hours.to_string())
            .replace("{weeks}", &availability.weeks.to_string()),
    );
    prompt.push('\n');

    prompt
}
