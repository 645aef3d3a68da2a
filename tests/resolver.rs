#[cfg(test)]
mod resolver_tests {
    use rox::ast::{Expr, ExprId, Stmt};
    use rox::error::LoxError;
    use rox::parser::parse;
    use rox::resolver::{resolve, Locals, Resolver};
    use rox::scanner::scan;

    fn parse_clean(source: &str) -> Vec<Stmt> {
        let (tokens, lex_errors) = scan(source);
        assert!(lex_errors.is_empty(), "unexpected lex errors: {:?}", lex_errors);

        let (statements, errors) = parse(&tokens);
        assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);

        statements
    }

    /// Every resolvable reference in source order, keyed by its lexeme.
    fn references(statements: &[Stmt]) -> Vec<(String, ExprId)> {
        let mut found = Vec::new();
        for stmt in statements {
            collect_stmt(stmt, &mut found);
        }

        found
    }

    fn collect_stmt(stmt: &Stmt, found: &mut Vec<(String, ExprId)>) {
        match stmt {
            Stmt::Block(statements) => statements.iter().for_each(|s| collect_stmt(s, found)),
            Stmt::Class {
                superclass,
                methods,
                ..
            } => {
                if let Some(expr) = superclass {
                    collect_expr(expr, found);
                }
                for method in methods {
                    method.body.iter().for_each(|s| collect_stmt(s, found));
                }
            }
            Stmt::Expression(expr) | Stmt::Print(expr) => collect_expr(expr, found),
            Stmt::Function(decl) => decl.body.iter().for_each(|s| collect_stmt(s, found)),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                collect_expr(condition, found);
                collect_stmt(then_branch, found);
                if let Some(else_branch) = else_branch {
                    collect_stmt(else_branch, found);
                }
            }
            Stmt::Return { value, .. } | Stmt::Var {
                initializer: value, ..
            } => {
                if let Some(expr) = value {
                    collect_expr(expr, found);
                }
            }
            Stmt::While { condition, body } => {
                collect_expr(condition, found);
                collect_stmt(body, found);
            }
        }
    }

    fn collect_expr(expr: &Expr, found: &mut Vec<(String, ExprId)>) {
        match expr {
            Expr::Assign { id, name, value } => {
                collect_expr(value, found);
                found.push((name.lexeme.clone(), *id));
            }
            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                collect_expr(left, found);
                collect_expr(right, found);
            }
            Expr::Call {
                callee, arguments, ..
            } => {
                collect_expr(callee, found);
                arguments.iter().for_each(|a| collect_expr(a, found));
            }
            Expr::Get { object, .. } => collect_expr(object, found),
            Expr::Grouping(inner) | Expr::Unary { right: inner, .. } => collect_expr(inner, found),
            Expr::Literal(_) => {}
            Expr::Set { object, value, .. } => {
                collect_expr(value, found);
                collect_expr(object, found);
            }
            Expr::Super { id, keyword, .. } | Expr::This { id, keyword } => {
                found.push((keyword.lexeme.clone(), *id));
            }
            Expr::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                collect_expr(condition, found);
                collect_expr(then_branch, found);
                collect_expr(else_branch, found);
            }
            Expr::Variable { id, name } => found.push((name.lexeme.clone(), *id)),
        }
    }

    /// Resolve `source` cleanly, returning `(lexeme, depth)` per reference;
    /// `None` marks a global.
    fn depths(source: &str) -> Vec<(String, Option<usize>)> {
        let statements = parse_clean(source);
        let (locals, errors) = resolve(&statements);
        assert!(errors.is_empty(), "unexpected resolve errors: {:?}", errors);

        references(&statements)
            .into_iter()
            .map(|(name, id)| (name, locals.get(&id).copied()))
            .collect()
    }

    fn resolve_errors(source: &str) -> Vec<String> {
        let statements = parse_clean(source);
        let (_, errors) = resolve(&statements);

        errors.iter().map(|e: &LoxError| e.to_string()).collect()
    }

    fn entry(name: &str, depth: Option<usize>) -> (String, Option<usize>) {
        (name.to_string(), depth)
    }

    #[test]
    fn test_globals_are_left_out_of_the_table() {
        assert_eq!(
            depths("var g = 1; print g; g = 2;"),
            vec![entry("g", None), entry("g", None)]
        );
    }

    #[test]
    fn test_block_depths() {
        let source = "{ var a = 1; { var b = a; print b; print a; } print a; }";

        assert_eq!(
            depths(source),
            vec![
                entry("a", Some(1)),
                entry("b", Some(0)),
                entry("a", Some(1)),
                entry("a", Some(0)),
            ]
        );
    }

    #[test]
    fn test_shadowing_resolves_to_innermost() {
        assert_eq!(
            depths("{ var a = 1; { var a = 2; print a; } print a; }"),
            vec![entry("a", Some(0)), entry("a", Some(0))]
        );
    }

    #[test]
    fn test_closure_captures_enclosing_function_scope() {
        let source = "fun outer() { var x = 1; fun inner() { return x; } return inner; }";

        assert_eq!(
            depths(source),
            vec![entry("x", Some(1)), entry("inner", Some(0))]
        );
    }

    #[test]
    fn test_parameters_live_in_the_function_scope() {
        assert_eq!(
            depths("fun add(a, b) { return a + b; }"),
            vec![entry("a", Some(0)), entry("b", Some(0))]
        );
    }

    #[test]
    fn test_this_and_super_depths() {
        let source = "class A { m() { return 1; } }\n\
                      class B < A { m() { return this; } n() { return super.m; } }";

        assert_eq!(
            depths(source),
            vec![
                entry("A", None),
                entry("this", Some(1)),
                entry("super", Some(2)),
            ]
        );
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let source = "fun make() { var n = 0; fun inc() { n = n + 1; return n; } return inc; }\n\
                      { var c = make(); print c(); }";
        let statements = parse_clean(source);

        let (first, first_errors): (Locals, _) = Resolver::new().resolve(&statements);
        let (second, second_errors): (Locals, _) = Resolver::new().resolve(&statements);

        assert!(first_errors.is_empty() && second_errors.is_empty());
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn test_reading_local_in_own_initializer() {
        assert_eq!(
            resolve_errors("{ var a = a; }"),
            vec!["[line 1] Error at 'a': Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn test_global_self_reference_is_allowed() {
        assert!(resolve_errors("var a = a;").is_empty());
    }

    #[test]
    fn test_duplicate_local_declaration() {
        assert_eq!(
            resolve_errors("{ var a = 1; var a = 2; }"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
        assert_eq!(
            resolve_errors("fun f(a, a) {}"),
            vec!["[line 1] Error at 'a': Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn test_global_redeclaration_is_allowed() {
        assert!(resolve_errors("var a = 1; var a = 2;").is_empty());
    }

    #[test]
    fn test_misplaced_return() {
        assert_eq!(
            resolve_errors("return 1;"),
            vec!["[line 1] Error at 'return': Can't return from top-level code."]
        );
        assert_eq!(
            resolve_errors("class A { init() { return 1; } }"),
            vec!["[line 1] Error at 'return': Can't return a value from an initializer."]
        );
        assert!(resolve_errors("class A { init() { return; } }").is_empty());
    }

    #[test]
    fn test_misplaced_this_and_super() {
        assert_eq!(
            resolve_errors("print this;"),
            vec!["[line 1] Error at 'this': Can't use 'this' outside of a class."]
        );
        assert_eq!(
            resolve_errors("fun f() { return super.m; }"),
            vec!["[line 1] Error at 'super': Can't use 'super' outside of a class."]
        );
        assert_eq!(
            resolve_errors("class A { m() { return super.m; } }"),
            vec!["[line 1] Error at 'super': Can't use 'super' in a class with no superclass."]
        );
    }

    #[test]
    fn test_class_cannot_inherit_from_itself() {
        assert_eq!(
            resolve_errors("class A < A {}"),
            vec!["[line 1] Error at 'A': A class can't inherit from itself."]
        );
    }

    #[test]
    fn test_all_static_errors_are_collected() {
        let errors = resolve_errors("return 1;\nprint this;\n{ var x = 1; var x = 2; }");

        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("[line 1]"));
        assert!(errors[1].starts_with("[line 2]"));
        assert!(errors[2].starts_with("[line 3]"));
    }
}
