//! Text copied to the clipboard for each winner.

/// Direct message announcing the win to `handle`.
pub fn announcement_message(handle: &str) -> String {
    format!(
        "Merhaba @{}, çekilişimizi kazandınız! 🎉\n\nDetaylı bilgi için DM'den ulaşabilirsiniz.",
        handle.trim()
    )
}
