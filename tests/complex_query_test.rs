mod common;

use common::{pairs, search};
use solrq::{Criteria, QueryNode, Search};

type Build = fn(&Search) -> solrq::Result<Search>;

struct Case {
    build: Build,
    expected: Vec<(String, String)>,
}

fn case(build: Build, expected: &[(&str, &str)]) -> Case {
    Case {
        build,
        expected: pairs(expected),
    }
}

fn cases() -> Vec<Case> {
    vec![
        case(
            |s| {
                let any = s
                    .q(Criteria::new().field("text_field", "tow"))?
                    .or_with(&s.q(Criteria::new().field("boolean_field", false).gt("int_field", 3))?);
                s.query("hello world")?.filter(any)
            },
            &[
                ("fq", "text_field:tow OR (boolean_field:false AND int_field:{3 TO *})"),
                ("q", "hello\\ world"),
            ],
        ),
        case(
            |s| {
                let all = s
                    .q(Criteria::new().field("text_field", "tow"))?
                    .and_with(&s.q(Criteria::new().field("boolean_field", false).gt("int_field", 3))?);
                s.query("hello world")?.filter(all)
            },
            &[
                ("fq", "boolean_field:false AND text_field:tow AND int_field:{3 TO *}"),
                ("q", "hello\\ world"),
            ],
        ),
        // Top-level negations stay bare.
        case(
            |s| s.query(s.q("hello world")?.negate()),
            &[("q", "NOT hello\\ world")],
        ),
        case(
            |s| {
                let node = s
                    .q("hello world")?
                    .negate()
                    .and_with(&s.q(Criteria::new().field("int_field", 3))?.negate());
                s.query(node)
            },
            &[("q", "NOT hello\\ world AND NOT int_field:3")],
        ),
        case(
            |s| {
                let not = s.q(Criteria::new().field("int_field", 3))?.negate();
                s.query(Criteria::new().value("hello world").node(not))
            },
            &[("q", "hello\\ world AND NOT int_field:3")],
        ),
        case(
            |s| {
                let not = s.q(Criteria::new().field("int_field", 3))?.negate();
                s.query(Criteria::new().value("abc").node(s.q("def")?).node(not))
            },
            &[("q", "abc AND def AND NOT int_field:3")],
        ),
        case(
            |s| {
                let not = s.q(Criteria::new().field("int_field", 3))?.negate();
                s.query(Criteria::new().value("abc").node(s.q("def")?.and_with(&not)))
            },
            &[("q", "abc AND def AND NOT int_field:3")],
        ),
        // Negations under a disjunction need the match-all rewrite.
        case(
            |s| {
                let not = s.q(Criteria::new().field("int_field", 3))?.negate();
                s.query(Criteria::new().value("abc").node(s.q("def")?.or_with(&not)))
            },
            &[("q", "abc AND (def OR (*:* AND NOT int_field:3))")],
        ),
        case(
            |s| s.query(s.q("abc")?.or_with(&s.q("def")?.negate())),
            &[("q", "abc OR (*:* AND NOT def)")],
        ),
        case(
            |s| s.query(s.q("abc")?.or_with(&s.q(s.q("def")?.negate())?)),
            &[("q", "abc OR (*:* AND NOT def)")],
        ),
        // Flattening.
        case(
            |s| {
                let nested = s.q(s.q("xyz")?)?;
                s.query(Criteria::new().value("def").node(s.q("abc")?).node(nested))
            },
            &[("q", "abc AND def AND xyz")],
        ),
        case(
            |s| s.query(s.q("def")?.or_with(&s.q(s.q("xyz")?)?)),
            &[("q", "def OR xyz")],
        ),
        // Empty expressions are absorbed.
        case(
            |s| {
                let nested = QueryNode::Empty.and_with(&s.q("xyz")?);
                s.query(
                    Criteria::new()
                        .value("def")
                        .node(s.q("abc")?)
                        .node(QueryNode::Empty)
                        .node(nested),
                )
            },
            &[("q", "abc AND def AND xyz")],
        ),
        case(
            |s| {
                let nested = QueryNode::Empty.or_with(&s.q("xyz")?);
                s.query(QueryNode::Empty.or_with(&s.q("def")?).or_with(&nested))
            },
            &[("q", "def OR xyz")],
        ),
        // Double negation cancels at any depth.
        case(
            |s| s.query(s.q("def")?.negate().negate()),
            &[("q", "def")],
        ),
        case(
            |s| s.query(s.q("def")?.negate().negate().negate()),
            &[("q", "NOT def")],
        ),
        case(
            |s| {
                let inner = s.q(s.q(s.q("def")?.negate().negate())?)?;
                s.query(inner.negate())
            },
            &[("q", "NOT def")],
        ),
        case(
            |s| {
                let inner = QueryNode::Empty.or_with(&s.q("def")?.negate().negate());
                let outer = QueryNode::Empty.and_with(&inner);
                s.query(outer.negate())
            },
            &[("q", "NOT def")],
        ),
        case(
            |s| s.query(Criteria::new().value("AND").value("OR").value("NOT")),
            &[("q", "\"AND\" AND \"NOT\" AND \"OR\"")],
        ),
        case(
            |s| {
                let any = QueryNode::any([s.q("abc")?, s.q("def")?, s.q("ghi")?]);
                s.query("blah")?.query_exclude(any)
            },
            &[("q", "blah AND NOT (abc OR def OR ghi)")],
        ),
        case(
            |s| {
                let any = QueryNode::any([s.q("abc")?, s.q("def")?, s.q("ghi")?]);
                s.query("blah")?.exclude(any)
            },
            &[("fq", "NOT (abc OR def OR ghi)"), ("q", "blah")],
        ),
        // Boosts.
        case(
            |s| s.query("blah")?.query(s.q("def")?.boosted_by(1.5)?),
            &[("q", "blah AND def^1.5")],
        ),
        case(
            |s| {
                s.query("blah")?
                    .query(s.q("def")?.or_with(&s.q("ghi")?).boosted_by(1.5)?)
            },
            &[("q", "blah AND (def OR ghi)^1.5")],
        ),
        case(
            |s| {
                let any = s.q("pqr")?.negate().or_with(&s.q("mno")?);
                let boosted = s.q(Criteria::new().value("def").node(any))?.boosted_by(1.5)?;
                s.query("blah")?.query(boosted)
            },
            &[("q", "blah AND (def AND ((*:* AND NOT pqr) OR mno))^1.5")],
        ),
        case(
            |s| {
                s.query("blah")?
                    .boost_relevancy(1.5, Criteria::new().field("int_field", 3))
            },
            &[("q", "blah OR (blah AND int_field:3^1.5)")],
        ),
        case(
            |s| {
                s.query("blah")?
                    .query("blah2")?
                    .boost_relevancy(1.5, Criteria::new().field("int_field", 3))
            },
            &[("q", "(blah AND blah2) OR (blah AND blah2 AND int_field:3^1.5)")],
        ),
        // Ranges.
        case(
            |s| s.query(Criteria::new().any("int_field")),
            &[("q", "int_field:[* TO *]")],
        ),
        case(
            |s| {
                let not = s.q(Criteria::new().any("int_field"))?.negate();
                s.query(Criteria::new().value("blah").node(not))
            },
            &[("q", "blah AND NOT int_field:[* TO *]")],
        ),
    ]
}

#[test]
fn test_complex_boolean_queries() -> solrq::Result<()> {
    let base = search();
    for case in cases() {
        let params = (case.build)(&base)?.params();
        assert_eq!(params, case.expected);
        // Building again from the same base gives the same result.
        assert_eq!((case.build)(&base)?.params(), params);
    }
    assert_eq!(base.params(), pairs(&[("q", "*:*")]));
    Ok(())
}

#[test]
fn test_display_matches_render() -> solrq::Result<()> {
    let s = search();
    let node = s.q("abc")?.or_with(&s.q("def")?.negate());
    assert_eq!(node.to_string(), "abc OR (*:* AND NOT def)");
    Ok(())
}
