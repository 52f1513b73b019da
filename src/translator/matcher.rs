//! Matcher compiler
//!
//! Lowers a user matcher (path, headers, query parameters, methods) into a
//! proxy route match. Pure; the only context it needs is the regex program
//! size bound from the settings.

use envoy_types::pb::envoy::config::route::v3::{
    header_matcher::HeaderMatchSpecifier, query_parameter_matcher::QueryParameterMatchSpecifier,
    route_match, HeaderMatcher as EnvoyHeaderMatcher,
    QueryParameterMatcher as EnvoyQueryParameterMatcher, RouteMatch,
};
use envoy_types::pb::envoy::r#type::matcher::v3::{
    regex_matcher, string_matcher::MatchPattern, RegexMatcher, StringMatcher,
};
use envoy_types::pb::google::protobuf::UInt32Value;

use crate::config::TranslationSettings;
use crate::domain::{
    HeaderMatcher, Matcher, PathSpecifier, QueryParameterMatcher as DomainQueryParameterMatcher,
};

/// Lower a user matcher into a proxy route match.
///
/// A matcher without a path specifier produces a match with no path; the
/// caller is responsible for reporting it as invalid.
pub(crate) fn compile_matcher(settings: &TranslationSettings, matcher: &Matcher) -> RouteMatch {
    let mut out = RouteMatch {
        headers: header_matchers(&matcher.headers),
        query_parameters: query_matchers(&matcher.query_parameters),
        ..Default::default()
    };

    // methods are matched through the :method pseudo-header
    if !matcher.methods.is_empty() {
        out.headers.push(methods_header_matcher(&matcher.methods));
    }

    set_path_specifier(settings, matcher, &mut out);
    out
}

fn set_path_specifier(settings: &TranslationSettings, matcher: &Matcher, out: &mut RouteMatch) {
    match &matcher.path {
        Some(PathSpecifier::Exact(path)) => {
            out.path_specifier = Some(route_match::PathSpecifier::Path(path.clone()));
        }
        Some(PathSpecifier::Prefix(prefix)) => {
            out.path_specifier = Some(route_match::PathSpecifier::Prefix(prefix.clone()));
        }
        Some(PathSpecifier::Regex(regex)) => {
            out.path_specifier = Some(route_match::PathSpecifier::SafeRegex(safe_regex_bounded(
                regex,
                settings.safe_regex_max_program_size,
            )));
        }
        None => {}
    }
}

#[allow(deprecated)]
fn header_matchers(headers: &[HeaderMatcher]) -> Vec<EnvoyHeaderMatcher> {
    headers
        .iter()
        .map(|matcher| {
            let specifier = if matcher.value.is_empty() {
                HeaderMatchSpecifier::PresentMatch(true)
            } else if matcher.regex {
                HeaderMatchSpecifier::SafeRegexMatch(safe_regex(&matcher.value))
            } else {
                HeaderMatchSpecifier::ExactMatch(matcher.value.clone())
            };

            EnvoyHeaderMatcher {
                name: matcher.name.clone(),
                invert_match: matcher.invert_match,
                header_match_specifier: Some(specifier),
                ..Default::default()
            }
        })
        .collect()
}

fn query_matchers(
    query_parameters: &[DomainQueryParameterMatcher],
) -> Vec<EnvoyQueryParameterMatcher> {
    query_parameters
        .iter()
        .map(|matcher| {
            let specifier = if matcher.value.is_empty() {
                QueryParameterMatchSpecifier::PresentMatch(true)
            } else {
                let pattern = if matcher.regex {
                    MatchPattern::SafeRegex(safe_regex(&matcher.value))
                } else {
                    MatchPattern::Exact(matcher.value.clone())
                };
                QueryParameterMatchSpecifier::StringMatch(StringMatcher {
                    match_pattern: Some(pattern),
                    ..Default::default()
                })
            };

            EnvoyQueryParameterMatcher {
                name: matcher.name.clone(),
                query_parameter_match_specifier: Some(specifier),
                ..Default::default()
            }
        })
        .collect()
}

#[allow(deprecated)]
fn methods_header_matcher(methods: &[String]) -> EnvoyHeaderMatcher {
    EnvoyHeaderMatcher {
        name: ":method".to_string(),
        header_match_specifier: Some(HeaderMatchSpecifier::SafeRegexMatch(safe_regex(
            &methods.join("|"),
        ))),
        ..Default::default()
    }
}

/// RE2 matcher without a program size bound (header and query matchers).
#[allow(deprecated)]
fn safe_regex(regex: &str) -> RegexMatcher {
    RegexMatcher {
        engine_type: Some(regex_matcher::EngineType::GoogleRe2(regex_matcher::GoogleRe2 {
            max_program_size: None,
        })),
        regex: regex.to_string(),
    }
}

/// RE2 matcher bounded by the configured program size (path matchers).
#[allow(deprecated)]
fn safe_regex_bounded(regex: &str, max_program_size: u32) -> RegexMatcher {
    RegexMatcher {
        engine_type: Some(regex_matcher::EngineType::GoogleRe2(regex_matcher::GoogleRe2 {
            max_program_size: Some(UInt32Value { value: max_program_size }),
        })),
        regex: regex.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TranslationSettings {
        TranslationSettings::default()
    }

    #[test]
    fn test_path_specifier_variants() {
        let exact = compile_matcher(
            &settings(),
            &Matcher {
                path: Some(PathSpecifier::Exact("/exact".into())),
                ..Matcher::prefix("/")
            },
        );
        assert!(matches!(exact.path_specifier, Some(route_match::PathSpecifier::Path(_))));

        let prefix = compile_matcher(&settings(), &Matcher::prefix("/api"));
        assert!(matches!(
            prefix.path_specifier,
            Some(route_match::PathSpecifier::Prefix(ref p)) if p == "/api"
        ));

        let regex = compile_matcher(
            &settings(),
            &Matcher {
                path: Some(PathSpecifier::Regex(r"^/api/v\d+/.*".into())),
                ..Matcher::prefix("/")
            },
        );
        match regex.path_specifier {
            Some(route_match::PathSpecifier::SafeRegex(ref m)) => {
                assert_eq!(m.regex, r"^/api/v\d+/.*");
            }
            other => panic!("unexpected path specifier: {:?}", other),
        }
    }

    #[test]
    fn test_regex_path_carries_program_size_bound() {
        let mut custom = settings();
        custom.safe_regex_max_program_size = 200;
        let compiled = compile_matcher(
            &custom,
            &Matcher { path: Some(PathSpecifier::Regex("/a.*".into())), ..Matcher::prefix("/") },
        );
        let Some(route_match::PathSpecifier::SafeRegex(regex)) = compiled.path_specifier else {
            panic!("expected safe regex");
        };
        #[allow(deprecated)]
        let Some(regex_matcher::EngineType::GoogleRe2(re2)) = regex.engine_type else {
            panic!("expected RE2 engine");
        };
        #[allow(deprecated)]
        let size = re2.max_program_size.expect("program size bound");
        assert_eq!(size.value, 200);
    }

    #[test]
    fn test_missing_path_produces_no_path() {
        let compiled = compile_matcher(
            &settings(),
            &Matcher {
                path: None,
                headers: Vec::new(),
                query_parameters: Vec::new(),
                methods: Vec::new(),
            },
        );
        assert!(compiled.path_specifier.is_none());
    }

    #[test]
    #[allow(deprecated)]
    fn test_header_matcher_three_way_split() {
        let compiled = compile_matcher(
            &settings(),
            &Matcher {
                headers: vec![
                    HeaderMatcher {
                        name: "x-present".into(),
                        value: "".into(),
                        regex: false,
                        invert_match: false,
                    },
                    HeaderMatcher {
                        name: "x-exact".into(),
                        value: "yes".into(),
                        regex: false,
                        invert_match: true,
                    },
                    HeaderMatcher {
                        name: "x-re".into(),
                        value: "v[0-9]+".into(),
                        regex: true,
                        invert_match: false,
                    },
                ],
                ..Matcher::prefix("/")
            },
        );

        assert_eq!(compiled.headers.len(), 3);
        assert!(matches!(
            compiled.headers[0].header_match_specifier,
            Some(HeaderMatchSpecifier::PresentMatch(true))
        ));
        assert!(matches!(
            compiled.headers[1].header_match_specifier,
            Some(HeaderMatchSpecifier::ExactMatch(ref v)) if v == "yes"
        ));
        assert!(compiled.headers[1].invert_match);
        assert!(matches!(
            compiled.headers[2].header_match_specifier,
            Some(HeaderMatchSpecifier::SafeRegexMatch(_))
        ));
    }

    #[test]
    #[allow(deprecated)]
    fn test_methods_become_method_header_alternation() {
        let compiled = compile_matcher(
            &settings(),
            &Matcher { methods: vec!["GET".into(), "POST".into()], ..Matcher::prefix("/api") },
        );

        assert_eq!(compiled.headers.len(), 1);
        let method_matcher = &compiled.headers[0];
        assert_eq!(method_matcher.name, ":method");
        match &method_matcher.header_match_specifier {
            Some(HeaderMatchSpecifier::SafeRegexMatch(regex)) => {
                assert_eq!(regex.regex, "GET|POST");
            }
            other => panic!("unexpected specifier: {:?}", other),
        }
    }

    #[test]
    fn test_query_matcher_wraps_string_match() {
        let compiled = compile_matcher(
            &settings(),
            &Matcher {
                query_parameters: vec![
                    DomainQueryParameterMatcher {
                        name: "page".into(),
                        value: "".into(),
                        regex: false,
                    },
                    DomainQueryParameterMatcher {
                        name: "sort".into(),
                        value: "asc".into(),
                        regex: false,
                    },
                ],
                ..Matcher::prefix("/")
            },
        );

        assert!(matches!(
            compiled.query_parameters[0].query_parameter_match_specifier,
            Some(QueryParameterMatchSpecifier::PresentMatch(true))
        ));
        match &compiled.query_parameters[1].query_parameter_match_specifier {
            Some(QueryParameterMatchSpecifier::StringMatch(sm)) => {
                assert!(matches!(sm.match_pattern, Some(MatchPattern::Exact(ref v)) if v == "asc"));
            }
            other => panic!("unexpected specifier: {:?}", other),
        }
    }
}
