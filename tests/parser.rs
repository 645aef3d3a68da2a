#[cfg(test)]
mod parser_tests {
    use rox::ast::{Expr, LiteralValue, Stmt};
    use rox::error::LoxError;
    use rox::parser::Parser;
    use rox::scanner::scan;
    use rox::token::TokenType;

    fn parse_source(source: &str) -> (Vec<Stmt>, Vec<LoxError>) {
        let (tokens, lex_errors) = scan(source);
        assert!(lex_errors.is_empty(), "unexpected lex errors: {:?}", lex_errors);

        Parser::new(&tokens).parse()
    }

    fn parse_clean(source: &str) -> Vec<Stmt> {
        let (statements, errors) = parse_source(source);
        assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);

        statements
    }

    fn single_expression(source: &str) -> Expr {
        let mut statements = parse_clean(source);
        assert_eq!(statements.len(), 1);

        match statements.remove(0) {
            Stmt::Expression(expr) => expr,
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_factor_binds_tighter_than_term() {
        let expr = single_expression("1 + 2 * 3;");

        let Expr::Binary {
            left,
            operator,
            right,
        } = expr
        else {
            panic!("Expected binary expression");
        };

        assert_eq!(operator.token_type, TokenType::PLUS);
        assert_eq!(*left, Expr::Literal(LiteralValue::Number(1.0)));
        assert!(matches!(
            *right,
            Expr::Binary { ref operator, .. } if operator.token_type == TokenType::STAR
        ));
    }

    #[test]
    fn test_binary_operators_are_left_associative() {
        let expr = single_expression("8 - 4 - 2;");

        let Expr::Binary { left, right, .. } = expr else {
            panic!("Expected binary expression");
        };

        assert!(matches!(*left, Expr::Binary { .. }));
        assert_eq!(*right, Expr::Literal(LiteralValue::Number(2.0)));
    }

    #[test]
    fn test_ternary_is_right_associative() {
        let expr = single_expression("a ? b : c ? d : e;");

        let Expr::Ternary {
            condition,
            then_branch,
            else_branch,
        } = expr
        else {
            panic!("Expected conditional expression");
        };

        assert!(matches!(*condition, Expr::Variable { ref name, .. } if name.lexeme == "a"));
        assert!(matches!(*then_branch, Expr::Variable { ref name, .. } if name.lexeme == "b"));
        assert!(matches!(*else_branch, Expr::Ternary { .. }));
    }

    #[test]
    fn test_ternary_binds_looser_than_or() {
        let expr = single_expression("a or b ? 1 : 2;");

        assert!(matches!(
            expr,
            Expr::Ternary { ref condition, .. } if matches!(**condition, Expr::Logical { .. })
        ));
    }

    #[test]
    fn test_for_loop_desugars_to_while() {
        let statements = parse_clean("for (var i = 0; i < 3; i = i + 1) print i;");

        assert_eq!(statements.len(), 1);

        let Stmt::Block(outer) = &statements[0] else {
            panic!("Expected block around desugared for loop");
        };

        assert_eq!(outer.len(), 2);
        assert!(matches!(&outer[0], Stmt::Var { name, .. } if name.lexeme == "i"));

        let Stmt::While { condition, body } = &outer[1] else {
            panic!("Expected while loop");
        };

        assert!(matches!(condition, Expr::Binary { .. }));

        let Stmt::Block(inner) = body.as_ref() else {
            panic!("Expected body block with increment");
        };

        assert!(matches!(&inner[0], Stmt::Print(_)));
        assert!(matches!(&inner[1], Stmt::Expression(Expr::Assign { .. })));
    }

    #[test]
    fn test_for_loop_without_clauses_loops_forever() {
        let statements = parse_clean("for (;;) print 1;");

        assert_eq!(statements.len(), 1);
        match &statements[0] {
            Stmt::While { condition, body } => {
                assert_eq!(*condition, Expr::Literal(LiteralValue::Bool(true)));
                assert!(matches!(body.as_ref(), Stmt::Print(_)));
            }
            other => panic!("Expected bare while loop, got {:?}", other),
        }
    }

    #[test]
    fn test_class_declaration_with_superclass() {
        let statements = parse_clean("class B < A { init(x) { this.x = x; } m() {} }");

        let Stmt::Class {
            name,
            superclass,
            methods,
        } = &statements[0]
        else {
            panic!("Expected class declaration");
        };

        assert_eq!(name.lexeme, "B");
        assert!(matches!(superclass, Some(Expr::Variable { name, .. }) if name.lexeme == "A"));
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[0].name.lexeme, "init");
        assert_eq!(methods[0].params.len(), 1);
        assert!(matches!(
            &methods[0].body[0],
            Stmt::Expression(Expr::Set { name, .. }) if name.lexeme == "x"
        ));
        assert!(methods[1].params.is_empty());
    }

    #[test]
    fn test_super_access_and_call_chain() {
        let expr = single_expression("super.m(1).field;");

        let Expr::Get { object, name } = expr else {
            panic!("Expected property access");
        };

        assert_eq!(name.lexeme, "field");

        let Expr::Call {
            callee, arguments, ..
        } = *object
        else {
            panic!("Expected call");
        };

        assert_eq!(arguments.len(), 1);
        assert!(matches!(*callee, Expr::Super { ref method, .. } if method.lexeme == "m"));
    }

    #[test]
    fn test_each_reference_gets_its_own_id() {
        let statements = parse_clean("a; a;");

        let ids: Vec<_> = statements
            .iter()
            .map(|stmt| match stmt {
                Stmt::Expression(Expr::Variable { id, .. }) => *id,
                other => panic!("Expected variable reference, got {:?}", other),
            })
            .collect();

        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_invalid_assignment_target_is_not_fatal() {
        let (statements, errors) = parse_source("1 = 2; print 3;");

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].to_string(),
            "[line 1] Error at '=': Invalid assignment target."
        );
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_recovers_and_reports_every_syntax_error() {
        let (statements, errors) = parse_source("var = 1;\nprint 2;\nvar x = ;\nprint 3;");

        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();

        assert_eq!(
            messages,
            vec![
                "[line 1] Error at '=': Expected variable name.",
                "[line 3] Error at ';': Expected expression.",
            ]
        );
        assert_eq!(statements.len(), 2);
        assert!(statements.iter().all(|s| matches!(s, Stmt::Print(_))));
    }

    #[test]
    fn test_error_at_end_of_input() {
        let (_, errors) = parse_source("print 1");

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], LoxError::Parse { .. }));
        assert_eq!(
            errors[0].to_string(),
            "[line 1] Error at end: Expected ';' after value."
        );
    }

    #[test]
    fn test_unclosed_block_inside_function() {
        let (_, errors) = parse_source("fun f() { print 1;");

        assert!(!errors.is_empty());
        assert_eq!(errors[0].message(), "Expected '}' after block.");
    }

    #[test]
    fn test_too_many_arguments_is_reported_once() {
        let args: Vec<String> = (0..256).map(|i| i.to_string()).collect();
        let source = format!("f({});", args.join(", "));

        let (statements, errors) = parse_source(&source);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Can't have more than 255 arguments.");
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_too_many_parameters_is_reported() {
        let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
        let source = format!("fun f({}) {{}}", params.join(", "));

        let (_, errors) = parse_source(&source);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Can't have more than 255 parameters.");
    }

    #[test]
    fn test_empty_token_slice_parses_to_nothing() {
        let (statements, errors) = Parser::new(&[]).parse();

        assert!(statements.is_empty());
        assert!(errors.is_empty());
    }
}
