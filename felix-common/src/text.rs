//! チャットメッセージの分割と、返信文の組み立てに使う文字列処理。

/// 空白で区切ってトークン列にする。
/// `"` か `'` で始まるトークンは、同じ引用符で終わるトークンまでを 1 つにまとめる(引用符は取り除く)。
/// 閉じられていない引用符はただの文字として扱う。
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = vec![];
    let mut rest = text.trim_start();
    while !rest.is_empty() {
        let (token, remaining) = next_token(rest);
        tokens.push(token);
        rest = remaining.trim_start();
    }
    tokens
}

fn next_token(text: &str) -> (String, &str) {
    if let Some(quote) = text.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let body = &text[1..];
        let mut search_from = 0;
        while let Some(position) = body[search_from..].find(quote) {
            let close = search_from + position;
            let after = &body[close + 1..];
            if after.is_empty() || after.starts_with(char::is_whitespace) {
                return (body[..close].to_string(), after);
            }
            search_from = close + 1;
        }
    }

    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    (text[..end].to_string(), &text[end..])
}

/// `["a", "b", "c"]` を `a, b and c` の形にする。各要素は `prefix` と `suffix` で囲まれる。
pub fn english_list<T: AsRef<str>>(items: impl IntoIterator<Item = T>, prefix: &str, suffix: &str) -> String {
    let items: Vec<_> = items.into_iter().collect();
    let mut joined = String::new();
    for (i, item) in items.iter().enumerate() {
        if i != 0 {
            if i == items.len() - 1 {
                joined.push_str(" and ");
            } else {
                joined.push_str(", ");
            }
        }
        joined.push_str(prefix);
        joined.push_str(item.as_ref());
        joined.push_str(suffix);
    }
    joined
}

pub fn prefixed(prefix: char, name: &str) -> String {
    format!("{prefix}{name}")
}

/// コマンドの値を返信するときの形式 (`!name: value`)。
pub fn wrap_prefix(prefix: char, name: &str, value: &str) -> String {
    format!("{prefix}{name}: {value}")
}
