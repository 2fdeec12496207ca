/// 返信の送り先の種類。コマンド名の先頭の記号で決まる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// チャンネルにそのまま送る。
    Default,

    /// `>name`: チャンネルに宛先の名前を付けて送る。
    UserPublic,

    /// `>>name`: 宛先に個別に送る。
    UserPrivate,

    /// `<name`: 要求者に個別に送る。
    SelfPrivate,
}

impl Target {
    /// コマンド名の最初のトークンから送り先の種類を判定する。
    pub fn of(token: &str) -> Target {
        if token.starts_with(">>") {
            Target::UserPrivate
        } else if token.starts_with('>') {
            Target::UserPublic
        } else if token.starts_with('<') {
            Target::SelfPrivate
        } else {
            Target::Default
        }
    }

    /// 素のコマンド名を得るために取り除く先頭の文字数。
    pub fn strip_len(&self) -> usize {
        match self {
            Target::Default => 0,
            Target::UserPublic | Target::SelfPrivate => 1,
            Target::UserPrivate => 2,
        }
    }

    /// `of` で判定して記号を取り除いた名前を返す。
    pub fn split(token: &str) -> (Target, &str) {
        let target = Target::of(token);
        // 記号はすべて ASCII なのでバイト境界で切ってよい
        (target, &token[target.strip_len()..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_tokens() {
        assert_eq!(Target::of(""), Target::Default);
        assert_eq!(Target::of("hello"), Target::Default);
        assert_eq!(Target::of(">bob"), Target::UserPublic);
        assert_eq!(Target::of(">>bob"), Target::UserPrivate);
        assert_eq!(Target::of("<"), Target::SelfPrivate);
        assert_eq!(Target::of(">"), Target::UserPublic);
        assert_eq!(Target::of("<<x"), Target::SelfPrivate);
    }

    #[test]
    fn strip_lengths() {
        assert_eq!(Target::of("").strip_len(), 0);
        assert_eq!(Target::of(">bob").strip_len(), 1);
        assert_eq!(Target::of(">>bob").strip_len(), 2);
        assert_eq!(Target::of("<").strip_len(), 1);
        assert_eq!(Target::of("hello").strip_len(), 0);
    }

    #[test]
    fn splits_bare_name() {
        assert_eq!(Target::split(">>rules"), (Target::UserPrivate, "rules"));
        assert_eq!(Target::split(">rules"), (Target::UserPublic, "rules"));
        assert_eq!(Target::split("<rules"), (Target::SelfPrivate, "rules"));
        assert_eq!(Target::split("rules"), (Target::Default, "rules"));
        assert_eq!(Target::split(">"), (Target::UserPublic, ""));
    }
}
