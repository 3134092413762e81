pub fn formatter_str(c: &str) -> String {
    let s = c[..c.len().min(33)].escape_default().to_string();
    let s = s.replace("\\\"", "\"");
    let s = s.replace("\\\'", "\'");
    let s = &s[..s.len().min(33)];
    format!("{:<35}", "|".to_string() + s + "|")
}

pub fn type_suffix(type_name: &str) -> &str {
    if let Some(i) = type_name.rfind("::") {
        &type_name[i + 2..]
    } else {
        type_name
    }
}
