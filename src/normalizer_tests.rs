//! Unit tests for record normalization.

use super::*;

fn raw(name: &str, quantity: &str, price: &str, date: &str) -> RawProduct {
    RawProduct {
        name: name.to_string(),
        quantity: quantity.to_string(),
        price: price.to_string(),
        date_updated: RawDate::Text(date.to_string()),
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

mod parse_quantity_tests {
    use super::*;

    #[test]
    fn parses_whole_number() {
        assert_eq!(parse_quantity("10"), Ok(10));
    }

    #[test]
    fn trims_whitespace() {
        assert_eq!(parse_quantity(" 7 "), Ok(7));
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(
            parse_quantity("ten"),
            Err(FieldError::InvalidQuantity("ten".to_string()))
        );
    }

    #[test]
    fn rejects_negative() {
        assert!(parse_quantity("-3").is_err());
    }

    #[test]
    fn rejects_decimal() {
        assert!(parse_quantity("2.5").is_err());
    }

    #[test]
    fn rejects_empty() {
        assert!(parse_quantity("").is_err());
    }

    #[test]
    fn rejects_out_of_range_with_limit_in_message() {
        let err = parse_quantity("5000000000").unwrap_err();
        assert_eq!(err, FieldError::InvalidQuantity("5000000000".to_string()));
        assert_eq!(
            err.to_string(),
            "quantity '5000000000' is not a whole number from 0 to 4294967295"
        );
    }

    #[test]
    fn accepts_upper_limit() {
        assert_eq!(parse_quantity("4294967295"), Ok(u32::MAX));
    }
}

mod parse_price_tests {
    use super::*;

    #[test]
    fn strips_currency_symbol_and_point() {
        assert_eq!(parse_price_cents("$12.50"), Ok(1250));
    }

    #[test]
    fn strips_point_without_symbol() {
        assert_eq!(parse_price_cents("12.50"), Ok(1250));
    }

    #[test]
    fn thousands_separator_and_plain_digits_agree() {
        assert_eq!(parse_price_cents("$1,234.56"), Ok(123456));
        assert_eq!(parse_price_cents("123456"), Ok(123456));
    }

    #[test]
    fn single_decimal_is_taken_literally() {
        // Known lossy behavior: digits are concatenated, not scaled
        assert_eq!(parse_price_cents("$5.5"), Ok(55));
        assert_eq!(parse_price_cents("$5"), Ok(5));
    }

    #[test]
    fn rejects_value_without_digits() {
        assert_eq!(
            parse_price_cents("free"),
            Err(FieldError::InvalidPrice("free".to_string()))
        );
        assert!(parse_price_cents("").is_err());
    }

    #[test]
    fn rejects_overflow() {
        assert!(parse_price_cents("$99999999999999999999.99").is_err());
    }
}

mod parse_date_tests {
    use super::*;

    #[test]
    fn parses_month_day_year() {
        let date = parse_date(&RawDate::Text("01/02/2020".to_string())).unwrap();
        assert_eq!(date, ymd(2020, 1, 2));
    }

    #[test]
    fn passes_typed_date_through() {
        let date = ymd(2021, 12, 31);
        assert_eq!(parse_date(&RawDate::Date(date)), Ok(date));
    }

    #[test]
    fn rejects_iso_format() {
        assert!(parse_date(&RawDate::Text("2020-01-02".to_string())).is_err());
    }

    #[test]
    fn rejects_impossible_date() {
        assert!(parse_date(&RawDate::Text("02/30/2020".to_string())).is_err());
    }
}

mod normalize_product_tests {
    use super::*;

    #[test]
    fn normalizes_widget_row() {
        let product = normalize_product(&raw("Widget", "10", "$5.00", "01/02/2020")).unwrap();
        assert_eq!(
            product,
            NewProduct {
                name: "Widget".to_string(),
                quantity: 10,
                price: 500,
                last_updated: ymd(2020, 1, 2),
            }
        );
    }

    #[test]
    fn trims_name() {
        let product = normalize_product(&raw("  Widget ", "1", "1", "01/02/2020")).unwrap();
        assert_eq!(product.name, "Widget");
    }

    #[test]
    fn collects_every_bad_field() {
        let problems = normalize_product(&raw("Widget", "x", "n/a", "soon")).unwrap_err();
        assert_eq!(problems.len(), 3);
        assert!(matches!(problems[0], FieldError::InvalidQuantity(_)));
        assert!(matches!(problems[1], FieldError::InvalidPrice(_)));
        assert!(matches!(problems[2], FieldError::InvalidDate(_)));
    }

    #[test]
    fn empty_name_is_an_error() {
        let problems = normalize_product(&raw("  ", "1", "$1.00", "01/02/2020")).unwrap_err();
        assert_eq!(problems, vec![FieldError::EmptyName]);
    }
}

mod batch_tests {
    use super::*;

    #[test]
    fn bad_row_does_not_stop_batch() {
        let batch = normalize_rows(vec![
            (Some(2), raw("Widget", "10", "$5.00", "01/02/2020")),
            (Some(3), raw("Gadget", "lots", "$1.00", "01/02/2020")),
            (Some(4), raw("Gizmo", "3", "$2.25", "03/04/2021")),
        ]);

        assert_eq!(batch.len(), 3);
        assert!(!batch.is_clean());

        let names: Vec<&str> = batch.products().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Widget", "Gizmo"]);

        let errors: Vec<&RowError> = batch.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].product_name, "Gadget");
        assert_eq!(errors[0].line, Some(3));
    }

    #[test]
    fn outcomes_keep_input_order() {
        let batch = normalize_rows(vec![
            (None, raw("A", "bad", "1", "01/01/2020")),
            (None, raw("B", "1", "1", "01/01/2020")),
        ]);
        let outcomes = batch.outcomes();
        assert!(outcomes[0].is_err());
        assert!(outcomes[1].is_ok());
    }

    #[test]
    fn empty_batch_is_clean() {
        let batch = normalize_rows(Vec::new());
        assert!(batch.is_empty());
        assert!(batch.is_clean());
    }

    #[test]
    fn push_error_records_malformed_row() {
        let mut batch = NormalizedBatch::new();
        batch.push_error(RowError::malformed(Some(9), "found 2 fields, expected 4"));
        assert_eq!(batch.errors().count(), 1);
        assert!(batch.into_outcomes()[0].is_err());
    }
}

mod row_error_display_tests {
    use super::*;

    #[test]
    fn names_product_and_problems() {
        let err = RowError {
            line: Some(5),
            product_name: "Gadget".to_string(),
            problems: vec![FieldError::InvalidQuantity("lots".to_string())],
        };
        assert_eq!(
            err.to_string(),
            "Line 5: Gadget contains unknown value(s) and must be manually reformatted: \
             quantity 'lots' is not a whole number from 0 to 4294967295"
        );
    }

    #[test]
    fn unnamed_row_without_line() {
        let err = RowError::malformed(None, "bad utf-8");
        assert_eq!(
            err.to_string(),
            "<unnamed row> contains unknown value(s) and must be manually reformatted: \
             malformed record: bad utf-8"
        );
    }

    #[test]
    fn joins_multiple_problems() {
        let err = RowError {
            line: None,
            product_name: "X".to_string(),
            problems: vec![FieldError::EmptyName, FieldError::InvalidDate("?".to_string())],
        };
        assert!(err
            .to_string()
            .ends_with(": product name is empty; date '?' is not in MM/DD/YYYY format"));
    }
}
