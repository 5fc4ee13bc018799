use std::path::{Component, Path, PathBuf};

/// Resolve `.` and `..` components without touching the file system.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(out.components().next_back(), Some(Component::Normal(_)))
                    && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Render a path as a `file://` URI.
///
/// Separators become `/`, relative paths are rooted, a Windows drive letter
/// is lowercased with its colon escaped, and every byte outside the
/// unreserved set is percent-encoded.
pub fn to_file_uri(path: &Path) -> String {
    let mut text = path.to_string_lossy().replace('\\', "/");
    if !text.starts_with('/') {
        text.insert(0, '/');
    }

    let bytes = text.as_bytes();
    let has_drive = bytes.len() >= 3 && bytes[1].is_ascii_alphabetic() && bytes[2] == b':';

    let mut uri = String::with_capacity(text.len() + 8);
    uri.push_str("file://");
    for (i, &byte) in bytes.iter().enumerate() {
        if has_drive && i == 1 {
            uri.push(byte.to_ascii_lowercase() as char);
            continue;
        }
        if is_unreserved(byte) || byte == b'/' {
            uri.push(byte as char);
        } else {
            uri.push_str(&format!("%{:02X}", byte));
        }
    }
    uri
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_' | b'~')
}
