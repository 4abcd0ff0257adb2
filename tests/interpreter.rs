mod common;

#[cfg(test)]
mod interpreter_tests {
    use pretty_assertions::assert_eq;

    use rox::error::Diagnostic;
    use rox::session::RunStatus;

    use crate::common::{output_of, run, session};

    fn assert_prints(source: &str, expected: &str) {
        let outcome = run(source);

        assert_eq!(
            outcome.diagnostics,
            Vec::<Diagnostic>::new(),
            "program should run cleanly"
        );
        assert_eq!(outcome.status, RunStatus::Ok);
        assert_eq!(outcome.output, expected);
    }

    fn assert_runtime_error(source: &str, message: &str, line: usize) {
        let outcome = run(source);

        assert_eq!(outcome.status, RunStatus::RuntimeError);
        assert_eq!(
            outcome.diagnostics,
            vec![Diagnostic::Runtime {
                line,
                message: message.to_string(),
            }]
        );
    }

    #[test]
    fn test_interpreter_01_number_formatting() {
        assert_prints("print 1.0;", "1\n");
        assert_prints("print 1.5;", "1.5\n");
        assert_prints("print -0.25 * 4;", "-1\n");
        assert_prints("print 10 / 4;", "2.5\n");
    }

    #[test]
    fn test_interpreter_02_arithmetic_and_strings() {
        assert_prints("print 1 + 2 * 3;", "7\n");
        assert_prints("print (1 + 2) * 3;", "9\n");
        assert_prints("print \"foo\" + \"bar\";", "foobar\n");
        assert_prints("print 3 > 2 == true;", "true\n");
        assert_prints("print nil;", "nil\n");
    }

    #[test]
    fn test_interpreter_03_truthiness_and_equality() {
        assert_prints("print !nil;", "true\n");
        assert_prints("print !0;", "false\n");
        assert_prints("print !\"\";", "false\n");
        assert_prints("print nil == nil;", "true\n");
        assert_prints("print nil == false;", "false\n");
        assert_prints("print 1 == \"1\";", "false\n");
        assert_prints("print \"a\" == \"a\";", "true\n");
    }

    #[test]
    fn test_interpreter_04_logical_operators_return_operands() {
        assert_prints("print nil or \"yes\";", "yes\n");
        assert_prints("print 1 and 2;", "2\n");
        assert_prints("print false and undefined;", "false\n");
        assert_prints("print true or undefined;", "true\n");
    }

    #[test]
    fn test_interpreter_05_ternary_evaluates_one_branch() {
        assert_prints("print true ? 1 : undefined;", "1\n");
        assert_prints("print nil ? undefined : 2;", "2\n");
        assert_prints("print false ? 1 : false ? 2 : 3;", "3\n");
    }

    #[test]
    fn test_interpreter_06_blocks_shadow_and_restore() {
        assert_prints(
            "var a = \"global\";\n{ var a = \"inner\"; print a; }\nprint a;",
            "inner\nglobal\n",
        );
    }

    #[test]
    fn test_interpreter_07_control_flow() {
        assert_prints(
            "var i = 0; while (i < 3) { print i; i = i + 1; }",
            "0\n1\n2\n",
        );
        assert_prints("for (var i = 0; i < 3; i = i + 1) print i;", "0\n1\n2\n");
        assert_prints("if (nil) print 1; else print 2;", "2\n");
        assert_prints(
            "var a = 0; var b = 1;\nfor (var n = 0; n < 8; n = n + 1) { var t = a; a = b; b = t + b; }\nprint a;",
            "21\n",
        );
    }

    #[test]
    fn test_interpreter_08_functions_and_return() {
        assert_prints(
            "fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); }\nprint fib(15);",
            "610\n",
        );
        assert_prints("fun f() {} print f();", "nil\n");
        assert_prints(
            "fun f() { while (true) { return \"out\"; } } print f();",
            "out\n",
        );
        assert_prints("fun f() {} print f;", "<fn f>\n");
        assert_prints("print clock;", "<native fn>\n");
    }

    #[test]
    fn test_interpreter_09_closures_count_independently() {
        assert_prints(
            "fun makeCounter() {\n  var i = 0;\n  fun count() { i = i + 1; print i; }\n  return count;\n}\n\
             var a = makeCounter();\nvar b = makeCounter();\na(); a(); a();\nb();",
            "1\n2\n3\n1\n",
        );
    }

    #[test]
    fn test_interpreter_10_closure_mutation_visible_from_both_sides() {
        assert_prints(
            "{\n  var x = \"before\";\n  fun set() { x = \"after\"; }\n  fun get() { return x; }\n  set();\n  print x;\n  print get();\n}",
            "after\nafter\n",
        );
    }

    #[test]
    fn test_interpreter_11_closures_bind_lexically() {
        assert_prints(
            "var a = \"global\";\n{\n  fun show() { print a; }\n  show();\n  var a = \"block\";\n  show();\n}",
            "global\nglobal\n",
        );
    }

    #[test]
    fn test_interpreter_12_classes_fields_and_methods() {
        assert_prints(
            "class Point {\n  init(x, y) { this.x = x; this.y = y; }\n  sum() { return this.x + this.y; }\n}\n\
             var p = Point(1, 2);\nprint p.sum();\np.x = 10;\nprint p.sum();\nprint p;\nprint Point;",
            "3\n12\nPoint instance\nPoint\n",
        );
    }

    #[test]
    fn test_interpreter_13_bound_methods_remember_this() {
        assert_prints(
            "class Cake { taste() { return this.flavor; } }\n\
             var c = Cake(); c.flavor = \"lemon\";\nvar m = c.taste;\nprint m();",
            "lemon\n",
        );
    }

    #[test]
    fn test_interpreter_14_fields_shadow_methods() {
        assert_prints(
            "class A { m() { return \"method\"; } }\nvar a = A();\na.m = \"field\";\nprint a.m;",
            "field\n",
        );
    }

    #[test]
    fn test_interpreter_15_inheritance_and_super() {
        assert_prints(
            "class A { method() { return \"A\"; } }\n\
             class B < A { method() { return \"B\"; } test() { return super.method(); } }\n\
             class C < B {}\n\
             print C().test();\nprint C().method();",
            "A\nB\n",
        );
        assert_prints(
            "class A { say() { print \"A\"; } }\n\
             class B < A { say() { print \"B\"; super.say(); } }\nB().say();",
            "B\nA\n",
        );
    }

    #[test]
    fn test_interpreter_16_initializer_returns_instance() {
        assert_prints(
            "class Foo {\n  init(n) { this.n = n; return; }\n}\n\
             var f = Foo(1);\nprint f.n;\nprint f.init(9) == f;\nprint f.n;",
            "1\ntrue\n9\n",
        );
    }

    #[test]
    fn test_interpreter_17_inherited_initializer_sets_arity() {
        assert_prints(
            "class A { init(a, b) { this.s = a + b; } }\nclass B < A {}\nprint B(1, 2).s;",
            "3\n",
        );
        assert_runtime_error(
            "class A { init(a, b) {} }\nclass B < A {}\nB(1);",
            "Expected 2 arguments but got 1.",
            3,
        );
    }

    #[test]
    fn test_interpreter_18_runtime_error_messages() {
        assert_runtime_error(
            "print 1 + \"a\";",
            "Operands must be two numbers or two strings.",
            1,
        );
        assert_runtime_error("print -\"x\";", "Operand must be a number.", 1);
        assert_runtime_error("print 1 < \"2\";", "Operands must be numbers.", 1);
        assert_runtime_error("print nope;", "Undefined variable 'nope'.", 1);
        assert_runtime_error("nope = 1;", "Undefined variable 'nope'.", 1);
        assert_runtime_error("\"str\"();", "Can only call functions and classes.", 1);
        assert_runtime_error(
            "fun f(a) {}\nf(1, 2);",
            "Expected 1 arguments but got 2.",
            2,
        );
        assert_runtime_error("var x = 1;\nx.y;", "Only instances have properties.", 2);
        assert_runtime_error("var x = 1;\nx.y = 2;", "Only instances have fields.", 2);
        assert_runtime_error(
            "class A {}\nA().missing;",
            "Undefined property 'missing'.",
            2,
        );
        assert_runtime_error(
            "var NotClass = 1;\nclass B < NotClass {}",
            "Superclass must be a class.",
            2,
        );
    }

    #[test]
    fn test_interpreter_19_runtime_error_keeps_earlier_effects() {
        let outcome = run("print \"one\";\nprint 1 + nil;\nprint \"three\";");

        assert_eq!(outcome.status, RunStatus::RuntimeError);
        assert_eq!(outcome.output, "one\n");
        assert_eq!(
            outcome.diagnostics[0].to_string(),
            "Operands must be two numbers or two strings.\n[line 2]"
        );
    }

    #[test]
    fn test_interpreter_20_division_by_zero_follows_ieee() {
        assert_prints("print 1 / 0 > 1000000;", "true\n");
        assert_prints("var n = 0 / 0; print n == n;", "false\n");
    }

    #[test]
    fn test_interpreter_21_deep_recursion_overflows_cleanly() {
        let outcome = run("fun f() { f(); }\nf();");

        assert_eq!(outcome.status, RunStatus::RuntimeError);
        assert_eq!(outcome.messages(), vec!["Stack overflow."]);
    }

    #[test]
    fn test_interpreter_22_session_keeps_globals_between_runs() {
        let mut session = session();

        assert_eq!(session.run("var counter = 0;"), RunStatus::Ok);
        assert_eq!(
            session.run("fun bump() { counter = counter + 1; return counter; }"),
            RunStatus::Ok
        );
        assert_eq!(session.run("print bump(); print bump();"), RunStatus::Ok);

        // A failed submission does not poison the next one.
        assert_eq!(session.run("print ;"), RunStatus::StaticError);
        assert_eq!(session.run("print undefinedThing;"), RunStatus::RuntimeError);
        assert_eq!(session.run("print counter;"), RunStatus::Ok);

        assert_eq!(output_of(&session), "1\n2\n2\n");
        assert_eq!(
            session.reporter().messages(),
            vec!["Expect expression.", "Undefined variable 'undefinedThing'."]
        );
    }

    #[test]
    fn test_interpreter_23_closures_survive_across_runs() {
        let mut session = session();

        session.run("fun make() { var n = 10; fun get() { return n; } return get; }");
        session.run("var g = make();");
        session.run("{ var shadow = 1; print g() + shadow; }");

        assert_eq!(output_of(&session), "11\n");
        assert!(session.reporter().diagnostics.is_empty());
    }

    #[test]
    fn test_interpreter_24_static_error_reports_location() {
        let outcome = run("var a = ;");

        assert_eq!(outcome.status, RunStatus::StaticError);
        assert_eq!(outcome.status.exit_code(), 65);
        assert_eq!(
            outcome.diagnostics[0].to_string(),
            "[line 1] Error at ';': Expect expression."
        );
    }

    #[test]
    fn test_interpreter_25_clock_is_a_global_native() {
        let session = session();
        assert!(session.interpreter().globals().borrow().contains("clock"));

        assert_prints("print clock() > 0;", "true\n");
        assert_runtime_error("clock(1);", "Expected 0 arguments but got 1.", 1);
    }

    #[test]
    fn test_interpreter_26_exit_codes() {
        assert_eq!(RunStatus::Ok.exit_code(), 0);
        assert_eq!(run("print 1 - nil;").status.exit_code(), 70);
    }
}
