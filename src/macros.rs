#[macro_export]
macro_rules! kind {
    ($k:literal) => {
        $crate::MatcherDoc::Explicit($crate::ExplicitMatcher::Kind($k.to_string()))
    };
}

#[macro_export]
macro_rules! lit {
    ($s:literal) => {
        $crate::MatcherDoc::Explicit($crate::ExplicitMatcher::Literal($s.to_string()))
    };
}

#[macro_export]
macro_rules! re {
    ($pat:literal) => {
        $crate::MatcherDoc::Explicit($crate::ExplicitMatcher::Regex($pat.to_string()))
    };
}

#[macro_export]
macro_rules! any {
    () => {
        $crate::MatcherDoc::Explicit($crate::ExplicitMatcher::Any(true))
    };
}

#[macro_export]
macro_rules! rule {
    (
        id: $id:expr,
        pattern: [ $($m:expr),* $(,)? ],
        $(priority: $priority:expr,)?
        $(captures: [ $($cap:expr),* $(,)? ],)?
        template: $template:expr
        $(, kind: $kind:expr)?
        $(,)?
    ) => {{
        $crate::RuleDoc {
            id: Some($id.to_string()),
            pattern: vec![ $($m),* ],
            priority: { let mut p = $crate::DEFAULT_PRIORITY; $(p = $priority;)? p },
            enabled: true,
            action: $crate::ActionDoc {
                template: $template.to_string(),
                captures: {
                    let mut c: Option<Vec<usize>> = None;
                    $(c = Some(vec![ $($cap),* ]);)?
                    c
                },
                kind: {
                    let mut k: Option<String> = None;
                    $(k = Some($kind.to_string());)?
                    k
                },
            },
        }
    }};
}
