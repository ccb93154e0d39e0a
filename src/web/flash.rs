/// Compose a flash message HTML snippet for known status or error codes.
pub fn compose_flash_message(status: Option<&str>, error: Option<&str>) -> String {
    if let Some(status) = status {
        let message = match status {
            "logged_out" => "You have been logged out.",
            "inquiry_posted" => "Your inquiry has been posted.",
            "inquiry_answered" => "The answer has been saved.",
            "review_posted" => "Your review has been posted.",
            "column_posted" => "The column has been published.",
            "column_updated" => "The column has been updated.",
            "column_deleted" => "The column has been deleted.",
            _ => "",
        };

        if !message.is_empty() {
            return format!(r#"<div class="flash success">{message}</div>"#);
        }
    }

    if let Some(error) = error {
        let message = match error {
            "not_authorized" => "You do not have permission to view that page.",
            "missing_fields" => "Please fill in both a title and some content.",
            "missing_answer" => "Please write an answer before submitting.",
            "store_failed" => "Saving failed. Please try again.",
            _ => "An unknown error occurred. Check the server logs.",
        };

        return format!(r#"<div class="flash error">{message}</div>"#);
    }

    String::new()
}
