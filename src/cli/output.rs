//! Plain-text table and detail printers for CLI output.

use crate::domain::{Function, Library, RequestLog, Skill, Tag, Topic, UserProfile};
use crate::store::Content;

/// Truncate to `max` characters, marking the cut with "..."
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

pub fn print_content_rows<C: Content>(rows: &[C]) {
    if rows.is_empty() {
        println!("No {} entries found.", C::KIND);
        return;
    }

    println!("{:<6} {:<42} {:<8}", "ID", "NAME", "VISIBLE");
    println!("{}", "-".repeat(58));
    for row in rows {
        println!(
            "{:<6} {:<42} {:<8}",
            row.id(),
            truncate(row.label(), 40),
            if row.is_visible() { "yes" } else { "no" }
        );
    }
}

pub fn print_library(library: &Library) {
    println!("Library:     {} ({})", library.name, library.id);
    println!("Creator:     {}", or_dash(library.creator));
    println!("Updated:     {}", library.timestamp);
    println!("Visible:     {}", library.visible);
    println!();
    println!("{}", library.description);
}

pub fn print_function(function: &Function) {
    println!("Function:    {} ({})", function.name, function.id);
    println!("Library:     {}", function.library);
    println!("Tag:         {}", or_dash(function.tag));
    println!("Creator:     {}", or_dash(function.creator));
    println!("Updated:     {}", function.timestamp);
    println!("Visible:     {}", function.visible);
    println!();
    println!("{}", function.description);
    println!();
    println!("Usage:");
    println!("  {}", function.instance);
    if !function.example.is_empty() {
        println!();
        println!("Example:");
        for line in function.example.lines() {
            println!("  {}", line);
        }
    }
}

pub fn print_topic(topic: &Topic) {
    println!("Topic:       {} ({})", topic.title, topic.id);
    println!("Creator:     {}", or_dash(topic.creator));
    println!("Updated:     {}", topic.timestamp);
    println!("Visible:     {}", topic.visible);
    println!();
    println!("{}", topic.description);
}

pub fn print_skill(skill: &Skill) {
    println!("Skill:       {} ({})", skill.title, skill.id);
    println!("Topic:       {}", skill.topic);
    println!("Tag:         {}", or_dash(skill.tag));
    println!("Creator:     {}", or_dash(skill.creator));
    println!("Updated:     {}", skill.timestamp);
    println!("Visible:     {}", skill.visible);
    println!();
    println!("Background:");
    println!("  {}", skill.background);
    println!();
    println!("Solution:");
    for line in skill.solution.lines() {
        println!("  {}", line);
    }
}

pub fn print_tags(tags: &[Tag]) {
    if tags.is_empty() {
        println!("No tags found.");
        return;
    }

    println!("{:<6} {:<10} {:<20}", "ID", "CATEGORY", "LABEL");
    println!("{}", "-".repeat(38));
    for tag in tags {
        println!("{:<6} {:<10} {:<20}", tag.id, tag.category.to_string(), tag.label);
    }
}

pub fn print_profile(profile: &UserProfile) {
    println!("Profile:      {}", profile.id);
    println!("Account:      {}", profile.account);
    println!("Display name: {}", profile.display_name);
    println!("Open tasks:   {}", profile.task);
}

pub fn print_request(log: &RequestLog) {
    println!("Request:     {}", log.id);
    println!("Type:        {}", log.request_type);
    println!("Target:      {}", log.target);
    println!("Filed by:    {}", or_dash(log.creator));
    println!("Filed at:    {}", log.timestamp);
    if log.is_pending() {
        println!("Status:      pending");
    } else {
        println!("Status:      confirmed by {}", or_dash(log.approver));
    }
    println!();
    println!("Subject:");
    println!("  {}", log.subject);
    println!();
    println!("Solution:");
    println!("  {}", log.solution);
    if !log.note.is_empty() {
        println!();
        println!("Note:");
        println!("  {}", log.note);
    }
}

pub fn print_requests(logs: &[RequestLog]) {
    if logs.is_empty() {
        println!("No requests found.");
        return;
    }

    println!(
        "{:<6} {:<8} {:<14} {:<42} {:<10}",
        "ID", "TYPE", "TARGET", "SUBJECT", "STATUS"
    );
    println!("{}", "-".repeat(84));
    for log in logs {
        println!(
            "{:<6} {:<8} {:<14} {:<42} {:<10}",
            log.id,
            log.request_type.to_string(),
            log.target.to_string(),
            truncate(&log.subject, 40),
            if log.is_pending() { "pending" } else { "confirmed" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("os", 10), "os");
        assert_eq!(truncate("collections.abc", 10), "collect...");
        assert_eq!(truncate("ééééé", 4), "é...");
    }
}
