// Shared by several bench targets; each one only uses some of these.
#[allow(dead_code)]
pub fn generate_hikidoc_content(size: usize) -> String {
    let base = "!Title\n\n!!Section\n\nParagraph with {''strong''} text and a WikiName.\n continued line\n\n* Bullet point\n** Nested item\n* Another item\n\n||!Key||Value\n||a||[[link|http://example.com/]]\n\n<<<pre\nfn example() {}\n>>>\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_nested_blocks(depth: usize) -> String {
    let mut content = String::new();
    for level in 0..depth {
        content.push_str(&format!("<<<div[level{level}]\nLevel {level} text.\n"));
    }
    content.push_str("*(((\ninner item\n)))\n");
    for _ in 0..depth {
        content.push_str(">>>\n");
    }
    content
}

/// Blocks that never close. Each failed block reparses every block after it,
/// so cost grows much faster than `count`.
#[allow(dead_code)]
pub fn generate_unclosed_blocks(count: usize) -> String {
    "<<<b\nline one\nline two\n".repeat(count)
}

#[allow(dead_code)]
pub fn generate_plugin_heavy(size: usize) -> String {
    "Text {{plugin('a}}b')}} more {{x}}\n\n{{block \"arg\"}}\n\n".repeat(size)
}
