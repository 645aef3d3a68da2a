#[cfg(test)]
mod scanner_tests {
    use rox::error::LoxError;
    use rox::scanner::*;
    use rox::token::*;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    fn assert_token_matches(
        result: &Result<Token, LoxError>,
        expected_type: TokenType,
        expected_lexeme: &str,
    ) {
        match result {
            Ok(token) => {
                assert_eq!(
                    token.token_type, expected_type,
                    "Expected token type {:?}, got {:?}",
                    expected_type, token.token_type
                );
                assert_eq!(
                    token.lexeme, expected_lexeme,
                    "Expected lexeme '{}', got '{}'",
                    expected_lexeme, token.lexeme
                );
            }
            Err(e) => panic!("Expected token but got error: {}", e),
        }
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_char_operators_are_greedy() {
        assert_token_sequence(
            "!= == <= >= ! = < > ?:[]",
            &[
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::BANG, "!"),
                (TokenType::EQUAL, "="),
                (TokenType::LESS, "<"),
                (TokenType::GREATER, ">"),
                (TokenType::QUESTION, "?"),
                (TokenType::COLON, ":"),
                (TokenType::LEFT_BRACKET, "["),
                (TokenType::RIGHT_BRACKET, "]"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "and andy _foo class1 while this super",
            &[
                (TokenType::AND, "and"),
                (TokenType::IDENTIFIER, "andy"),
                (TokenType::IDENTIFIER, "_foo"),
                (TokenType::IDENTIFIER, "class1"),
                (TokenType::WHILE, "while"),
                (TokenType::THIS, "this"),
                (TokenType::SUPER, "super"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_numbers() {
        let (tokens, errors) = scan("123 45.67 8.");

        assert!(errors.is_empty());

        let kinds: Vec<&TokenType> = tokens.iter().map(|t| &t.token_type).collect();

        assert!(matches!(kinds[0], TokenType::NUMBER(n) if *n == 123.0));
        assert!(matches!(kinds[1], TokenType::NUMBER(n) if *n == 45.67));
        assert!(matches!(kinds[2], TokenType::NUMBER(n) if *n == 8.0));
        assert_eq!(*kinds[3], TokenType::DOT);
        assert_eq!(*kinds[4], TokenType::EOF);
        assert_eq!(tokens[2].lexeme, "8");
    }

    #[test]
    fn test_scanner_05_multiline_string_tracks_lines() {
        let (tokens, errors) = scan("\"a\nb\" x");

        assert!(errors.is_empty());
        assert!(matches!(&tokens[0].token_type, TokenType::STRING(s) if s == "a\nb"));
        assert_eq!(tokens[0].lexeme, "\"a\nb\"");
        assert_eq!(tokens[1].lexeme, "x");
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_scanner_06_unterminated_string() {
        let results: Vec<_> = Scanner::new("\"abc").collect();

        assert_eq!(results.len(), 2);
        match &results[0] {
            Err(e) => assert_eq!(e.to_string(), "[line 1] Error: Unterminated string."),
            Ok(t) => panic!("Expected error, got token {}", t),
        }
        assert_token_matches(&results[1], TokenType::EOF, "");
    }

    #[test]
    fn test_scanner_07_comments() {
        let (tokens, errors) = scan("a // line comment\nb /* block\n\n comment */ c");

        assert!(errors.is_empty());

        let lines: Vec<(&str, usize)> = tokens
            .iter()
            .map(|t| (t.lexeme.as_str(), t.line))
            .collect();

        assert_eq!(lines, vec![("a", 1), ("b", 2), ("c", 4), ("", 4)]);
    }

    #[test]
    fn test_scanner_08_unterminated_block_comment() {
        let results: Vec<_> = Scanner::new("a /* never\nclosed").collect();

        assert_eq!(results.len(), 3);
        assert_token_matches(&results[0], TokenType::IDENTIFIER, "a");
        match &results[1] {
            Err(e) => {
                assert_eq!(e.message(), "Unterminated block comment.");
                assert_eq!(e.line(), Some(2));
            }
            Ok(t) => panic!("Expected error, got token {}", t),
        }
        assert_token_matches(&results[2], TokenType::EOF, "");
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = ",.$(#";
        let scanner = Scanner::new(source);

        // Collect all results (both tokens and errors)
        let results: Vec<_> = scanner.collect();

        // 0: COMMA ','
        // 1: DOT '.'
        // 2: Error for '$'
        // 3: LEFT_PAREN '('
        // 4: Error for '#'
        // 5: EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[1], TokenType::DOT, ".");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let error_count = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(error_count, 2, "Expected 2 error messages");

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            let text = err.to_string();
            assert!(
                text.contains("Unexpected character"),
                "Error message should contain 'Unexpected character', got: {}",
                text
            );
        }
    }

    #[test]
    fn test_non_ascii_character_is_one_error() {
        let (tokens, errors) = scan("é x \"naïve\"");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message(), "Unexpected character: é");
        assert_eq!(tokens[0].lexeme, "x");
        assert!(matches!(&tokens[1].token_type, TokenType::STRING(s) if s == "naïve"));
    }

    #[test]
    fn test_lexemes_round_trip() {
        let source = "var total = (1 + 2.5) * \"s\"; // trailing\nprint total >= 3;";
        let (tokens, errors) = scan(source);

        assert!(errors.is_empty());

        // Every lexeme is a verbatim slice of the source, in order.
        let mut cursor = 0;
        for token in tokens.iter().filter(|t| t.token_type != TokenType::EOF) {
            let at = source[cursor..]
                .find(token.lexeme.as_str())
                .unwrap_or_else(|| panic!("lexeme {:?} not found in order", token.lexeme));
            cursor += at + token.lexeme.len();
        }

        // Rebuilding text from lexemes and scanning again gives the same tokens.
        let rebuilt: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        let (again, errors) = scan(&rebuilt.join(" "));

        assert!(errors.is_empty());
        assert_eq!(again.len(), tokens.len());
        for (a, b) in again.iter().zip(tokens.iter()) {
            assert_eq!(a.token_type.name(), b.token_type.name());
            assert_eq!(a.lexeme, b.lexeme);
        }
    }

    #[test]
    fn test_token_display() {
        let (tokens, _) = scan("42 3.5 \"hi\" foo");

        let printed: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();

        assert_eq!(
            printed,
            vec![
                "NUMBER 42 42.0",
                "NUMBER 3.5 3.5",
                "STRING \"hi\" hi",
                "IDENTIFIER foo null",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn test_empty_source_yields_only_eof() {
        let results: Vec<_> = Scanner::new("").collect();

        assert_eq!(results.len(), 1);
        assert_token_matches(&results[0], TokenType::EOF, "");
    }
}
