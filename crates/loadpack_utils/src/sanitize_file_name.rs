/// Make a chunk name safe to splice into an output file name.
///
/// Path separators are kept so names such as `pages/home` still produce
/// nested output files.
pub fn sanitize_file_name(name: &str) -> String {
  name
    .chars()
    .map(|char| {
      if char.is_ascii_alphanumeric() || matches!(char, '-' | '_' | '.' | '/') {
        char
      } else {
        '_'
      }
    })
    .collect()
}

#[test]
fn test_sanitize_file_name() {
  assert_eq!(sanitize_file_name("\0+a=Z_0-"), "__a_Z_0-");
  assert_eq!(sanitize_file_name("pages/home page"), "pages/home_page");
}
