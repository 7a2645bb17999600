use crate::concat_string;

pub fn json_data_url(json: &str) -> String {
  concat_string!(
    "data:application/json;charset=utf-8;base64,",
    base64_simd::STANDARD.encode_to_string(json.as_bytes())
  )
}

#[test]
fn test_json_data_url() {
  assert_eq!(json_data_url("{}"), "data:application/json;charset=utf-8;base64,e30=");
}
