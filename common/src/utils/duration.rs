/// Renders whole seconds as `"1 minute and 5 seconds"`.
pub fn format_duration(total_secs: u64) -> String {
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!(
        "{minutes} minute{} and {seconds} second{}",
        plural(minutes),
        plural(seconds)
    )
}

fn plural(n: u64) -> &'static str {
    if n == 1 { "" } else { "s" }
}
