//! Type enforcement end to end: fixed slot types, defaults, array
//! homogeneity, structs, and tuples.

use super::{eval_err, eval_ok, eval_source, Session};
use crate::{EvalErrorKind, Value};

mod slots {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn assignment_must_match_the_declared_type() {
        let err = eval_err("int x; x = \"words\";");
        assert_eq!(
            err.kind,
            EvalErrorKind::TypeMismatch {
                expected: "int".to_owned(),
                found: "string".to_owned()
            }
        );
    }

    #[test]
    fn a_second_value_of_the_same_type_is_observable() {
        let source = "\
            int x;\n\
            x = 41;\n\
            x = x + 1;\n\
            x;";
        assert_eq!(eval_ok(source), Value::Int(42));
    }

    #[test]
    fn initializer_type_is_checked_against_the_annotation() {
        let err = eval_err("int x = \"nope\";");
        assert_eq!(
            err.kind,
            EvalErrorKind::TypeMismatch {
                expected: "int".to_owned(),
                found: "string".to_owned()
            }
        );
    }

    #[test]
    fn int_and_float_do_not_cross_assign() {
        assert!(matches!(
            eval_err("int x = 1.0;").kind,
            EvalErrorKind::TypeMismatch { .. }
        ));
        assert!(matches!(
            eval_err("float x = 1;").kind,
            EvalErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn declarations_without_initializer_get_defaults() {
        assert_eq!(eval_ok("int x; x;"), Value::Int(0));
        assert_eq!(eval_ok("float x; x;"), Value::Float(0.0));
        assert_eq!(eval_ok("string s; s;"), Value::string(""));
        assert_eq!(eval_ok("bool b; b;"), Value::Bool(false));
        assert_eq!(eval_ok("nothing n; n;"), Value::Nothing);
        assert_eq!(eval_ok("int[] xs; xs;"), eval_ok("[] ;"));
    }
}

mod arrays {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn literals_must_be_homogeneous() {
        let err = eval_err("[1, \"two\"];");
        assert_eq!(
            err.kind,
            EvalErrorKind::ElementTypeMismatch {
                expected: "int".to_owned(),
                found: "string".to_owned()
            }
        );
    }

    #[test]
    fn element_assignment_enforces_the_declared_element_type() {
        let err = eval_err("int[] xs = [1, 2]; xs[0] = \"s\";");
        assert_eq!(
            err.kind,
            EvalErrorKind::ElementTypeMismatch {
                expected: "int".to_owned(),
                found: "string".to_owned()
            }
        );
    }

    #[test]
    fn element_assignment_of_the_right_type_is_visible() {
        let source = "\
            int[] xs = [1, 2];\n\
            xs[1] = 9;\n\
            xs[1];";
        assert_eq!(eval_ok(source), Value::Int(9));
    }

    #[test]
    fn arrays_are_shared_mutable_values() {
        let source = "\
            int[] xs = [1, 2];\n\
            int[] ys = xs;\n\
            ys[0] = 99;\n\
            xs[0];";
        assert_eq!(eval_ok(source), Value::Int(99));
    }

    #[test]
    fn array_types_compare_by_element_type() {
        let err = eval_err("int[] xs = [1.5];");
        assert_eq!(
            err.kind,
            EvalErrorKind::TypeMismatch {
                expected: "int[]".to_owned(),
                found: "float[]".to_owned()
            }
        );
    }

    #[test]
    fn empty_literal_adopts_the_declared_element_type() {
        let source = "\
            int[] xs = [];\n\
            xs = [1, 2];\n\
            xs[0];";
        assert_eq!(eval_ok(source), Value::Int(1));
    }

    #[test]
    fn range_constructor_builds_an_int_array() {
        assert_eq!(eval_ok("[2..5];"), eval_ok("[2, 3, 4];"));
        assert_eq!(eval_ok("[3..3];"), eval_ok("int[] e; e;"));
    }
}

mod structs {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn literal_field_access_and_mutation() {
        let source = "\
            struct Point { int x; int y; }\n\
            Point p = Point { x: 1, y: 2 };\n\
            p.x = p.x + 10;\n\
            p.x;";
        assert_eq!(eval_ok(source), Value::Int(11));
    }

    #[test]
    fn structs_are_shared_mutable_values() {
        let source = "\
            struct Point { int x; int y; }\n\
            Point a = Point { x: 1, y: 2 };\n\
            Point b = a;\n\
            b.x = 7;\n\
            a.x;";
        assert_eq!(eval_ok(source), Value::Int(7));
    }

    #[test]
    fn literal_fields_are_type_checked() {
        let source = "\
            struct Point { int x; int y; }\n\
            Point { x: 1, y: \"two\" };";
        assert!(matches!(
            eval_err(source).kind,
            EvalErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn missing_and_unknown_fields_are_errors() {
        let missing = "\
            struct Point { int x; int y; }\n\
            Point { x: 1 };";
        assert!(matches!(
            eval_err(missing).kind,
            EvalErrorKind::MissingField { .. }
        ));

        let unknown = "\
            struct Point { int x; int y; }\n\
            Point { x: 1, y: 2, z: 3 };";
        assert!(matches!(
            eval_err(unknown).kind,
            EvalErrorKind::NoSuchField { .. }
        ));
    }

    #[test]
    fn field_assignment_is_type_checked() {
        let source = "\
            struct Point { int x; int y; }\n\
            Point p = Point { x: 1, y: 2 };\n\
            p.x = \"east\";";
        assert!(matches!(
            eval_err(source).kind,
            EvalErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn undeclared_struct_literals_fail() {
        let err = eval_err("Ghost { x: 1 };");
        assert_eq!(
            err.kind,
            EvalErrorKind::UnknownType {
                name: "Ghost".to_owned()
            }
        );
    }

    #[test]
    fn struct_declarations_persist_across_session_runs() {
        let mut session = Session::new();
        session.run("struct Point { int x; int y; }");
        let (value, errors) = session.run("Point p = Point { x: 3, y: 4 }; p.y;");
        assert!(errors.is_empty(), "{errors:?}");
        assert_eq!(value, Value::Int(4));
    }

    #[test]
    fn struct_default_fills_fields_with_defaults() {
        let source = "\
            struct Point { int x; int y; }\n\
            Point p;\n\
            (p.x, p.y);";
        assert_eq!(
            eval_ok(source),
            Value::tuple(vec![Value::Int(0), Value::Int(0)])
        );
    }
}

mod tuples {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tuple_slots_hold_their_shape() {
        let source = "\
            (int, string) pair = (1, \"one\");\n\
            pair[1];";
        assert_eq!(eval_ok(source), Value::string("one"));
    }

    #[test]
    fn tuple_shape_mismatch_fails() {
        let err = eval_err("(int, string) pair = (1, 2);");
        assert_eq!(
            err.kind,
            EvalErrorKind::TypeMismatch {
                expected: "(int, string)".to_owned(),
                found: "(int, int)".to_owned()
            }
        );
    }

    #[test]
    fn tuple_elements_cannot_be_assigned() {
        let err = eval_err("(int, int) pair = (1, 2); pair[0] = 9;");
        assert!(matches!(
            err.kind,
            EvalErrorKind::InvalidAssignTarget { .. }
        ));
    }
}

mod nullability {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nothing_slots_accept_only_nothing() {
        assert_eq!(eval_ok("nothing n = nothing; n;"), Value::Nothing);
        assert!(matches!(
            eval_err("nothing n = 0;").kind,
            EvalErrorKind::TypeMismatch { .. }
        ));
    }

    #[test]
    fn print_renders_nothing() {
        let (_, output) = eval_source("print(nothing);");
        assert_eq!(output, vec!["nothing"]);
    }
}
