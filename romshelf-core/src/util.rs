/// Format a byte count with fractional KB/MB/GB (e.g., "1.5 KB", "2.3 MB").
///
/// Disk images routinely run into gigabytes, so GB is included.
pub fn format_bytes_approx(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let b = bytes as f64;
    if b >= GB {
        format!("{:.1} GB", b / GB)
    } else if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_approx() {
        assert_eq!(format_bytes_approx(512), "512 B");
        assert_eq!(format_bytes_approx(1536), "1.5 KB");
        assert_eq!(format_bytes_approx(4 * 1024 * 1024), "4.0 MB");
        assert_eq!(format_bytes_approx(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
