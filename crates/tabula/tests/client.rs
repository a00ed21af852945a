//! Integration tests for the client row-lifecycle controller.

use tabula::{
    Behavior, ClientError, Command, Element, PropertyDescriptor, RenderOptions, State,
    TableColumn, TableController, TableEdit, TableEvent, TableHelper, TableMessage,
    TableRegistry, TypeDescriptor, Value,
};
use tabula_test::{line, lines, order_line_type, Markup};

fn table_for(model: &Value) -> Element {
    TableHelper::new()
        .editor_for("Order.Lines", model, &order_line_type(), &Value::Null)
        .unwrap()
        .elements()
        .next()
        .unwrap()
        .clone()
}

fn edit_table(row_type: &std::sync::Arc<TypeDescriptor>, model: &Value) -> Element {
    TableHelper::new()
        .editor_for("Lines", model, row_type, &Value::Null)
        .unwrap()
        .elements()
        .next()
        .unwrap()
        .clone()
}

fn controller(model: &Value) -> TableController {
    TableController::attach(table_for(model), &Behavior::ALL, &RenderOptions::default()).unwrap()
}

fn change(name: &str, value: &str) -> TableMessage {
    TableMessage::ChangeValue {
        name: name.to_string(),
        value: value.to_string(),
    }
}

fn delete(token: &str) -> TableMessage {
    TableMessage::DeleteRow {
        token: token.to_string(),
    }
}

fn restore(token: &str) -> TableMessage {
    TableMessage::RestoreRow {
        token: token.to_string(),
    }
}

fn markup(controller: &TableController) -> Markup {
    Markup::parse(&controller.table().to_html())
}

// =============================================================================
// Attach
// =============================================================================

#[test]
fn test_attach_reads_rendered_rows() {
    let c = controller(&lines(&[10, 20, 5]));
    assert_eq!(c.field(), "Order.Lines");
    assert_eq!(c.row_tokens(), vec!["0", "1", "2"]);
    assert_eq!(c.behaviors(), &[Behavior::NumericInput]);
    assert_eq!(c.footer_totals(), vec!["35".to_string()]);
    let row = c.row("1").unwrap();
    assert!(!row.is_new && !row.archived && !row.dirty);
}

#[test]
fn test_attach_fails_without_required_behavior() {
    let table = table_for(&lines(&[1]));
    let err = TableController::attach(table.clone(), &[], &RenderOptions::default()).unwrap_err();
    assert_eq!(err, ClientError::MissingEnhancement(Behavior::NumericInput));
    assert!(TableController::attach(table, &[Behavior::NumericInput], &RenderOptions::default()).is_ok());
}

#[test]
fn test_attach_rejects_read_only_table() {
    let table = TableHelper::new()
        .display_for("Order.Lines", &lines(&[1]), &order_line_type())
        .unwrap();
    let err = TableController::attach(table, &Behavior::ALL, &RenderOptions::default()).unwrap_err();
    assert_eq!(err, ClientError::NotAnEditTable);
}

#[test]
fn test_attach_marks_server_archived_rows() {
    let model = Value::List(vec![line(1, "A", 10, true), line(2, "B", 20, false)]);
    let c = controller(&model);
    assert!(c.row("1").unwrap().archived);
    assert_eq!(c.footer_totals(), vec!["10".to_string()]);
}

// =============================================================================
// Add and delete
// =============================================================================

#[test]
fn test_add_row_instantiates_template() {
    let mut c = controller(&lines(&[10, 20, 5]));
    let commands = c.update(TableMessage::AddRow).unwrap().flatten();

    assert_eq!(c.row_tokens(), vec!["0", "1", "2", "3"]);
    let row = c.row("3").unwrap();
    assert!(row.is_new && !row.archived && !row.dirty);

    let m = markup(&c);
    assert_eq!(m.count("tbody:not(.template-body) tr.edit-row"), 4);
    assert_eq!(m.count("tbody:not(.template-body) tr.validation-row"), 4);
    assert_eq!(m.hidden_value("Order.Lines[3].IsActive").as_deref(), Some("True"));
    assert!(m
        .hidden_inputs()
        .iter()
        .any(|(name, value)| name == "Order.Lines.Index" && value == "3"));
    assert_eq!(m.count(r#"[data-valmsg-for="Order.Lines[3].Qty"]"#), 1);

    assert!(commands.contains(&Command::Bind {
        behavior: Behavior::NumericInput,
        controls: vec!["Order.Lines[3].Qty".to_string()],
    }));
    assert!(commands.iter().any(|c| matches!(
        c,
        Command::Revalidate { controls } if controls.contains(&"Order.Lines[3].Qty".to_string())
    )));
    assert_eq!(
        commands.last(),
        Some(&Command::Focus {
            control: "Order.Lines[3].Product".to_string()
        })
    );
}

#[test]
fn test_add_then_delete_restores_markup() {
    let mut c = controller(&lines(&[10, 20, 5]));
    let before = c.table().to_html();

    c.update(TableMessage::AddRow).unwrap();
    c.update(change("Order.Lines[3].Qty", "7")).unwrap();
    assert_eq!(c.footer_totals(), vec!["42".to_string()]);

    let command = c.update(delete("3")).unwrap();
    assert!(matches!(
        command,
        Command::DropValidation { ref controls } if controls.contains(&"Order.Lines[3].Qty".to_string())
    ));
    assert_eq!(c.table().to_html(), before);
    assert!(c.row("3").is_none());
}

#[test]
fn test_added_tokens_are_never_reused() {
    let mut c = controller(&lines(&[1]));
    c.update(TableMessage::AddRow).unwrap();
    c.update(delete("1")).unwrap();
    c.update(TableMessage::AddRow).unwrap();
    assert_eq!(c.row_tokens(), vec!["0", "2"]);
}

#[test]
fn test_edit_settings_are_enforced() {
    let ty = TypeDescriptor::builder("Line")
        .property(PropertyDescriptor::integer("Qty").column(TableColumn::default().total()))
        .edit(TableEdit::default().no_additions().no_deletions())
        .build()
        .unwrap();
    let model = Value::List(vec![Value::object([("Qty", Value::from(2))])]);
    let table = TableHelper::new()
        .editor_for("Lines", &model, &ty, &Value::Null)
        .unwrap()
        .elements()
        .next()
        .unwrap()
        .clone();
    let mut c = TableController::attach(table, &Behavior::ALL, &RenderOptions::default()).unwrap();
    assert_eq!(
        c.update(TableMessage::AddRow).unwrap_err(),
        ClientError::NotAllowed("adding rows")
    );
    assert_eq!(c.update(delete("0")).unwrap_err(), ClientError::NotAllowed("deleting rows"));
}

#[test]
fn test_added_row_counts_in_totals_immediately() {
    let ty = TypeDescriptor::builder("Line")
        .property(PropertyDescriptor::integer("Qty").column(TableColumn::default().total()))
        .default_instance([("Qty".to_string(), Value::from(5))].into_iter().collect())
        .edit(TableEdit::default())
        .build()
        .unwrap();
    let model = Value::List(vec![Value::object([("Qty", Value::from(2))])]);
    let mut c =
        TableController::attach(edit_table(&ty, &model), &Behavior::ALL, &RenderOptions::default())
            .unwrap();
    assert_eq!(c.footer_totals(), vec!["2".to_string()]);

    c.update(TableMessage::AddRow).unwrap();
    assert_eq!(c.footer_totals(), vec!["7".to_string()]);
    c.update(delete("1")).unwrap();
    assert_eq!(c.footer_totals(), vec!["2".to_string()]);
}

// =============================================================================
// Archive and restore
// =============================================================================

#[test]
fn test_archive_and_restore_totals() {
    let mut c = controller(&lines(&[10, 20, 5]));
    assert_eq!(c.footer_totals(), vec!["35".to_string()]);

    let command = c.update(delete("1")).unwrap();
    assert_eq!(
        command,
        Command::Emit(TableEvent::RowDeleted {
            token: "1".to_string()
        })
    );
    assert_eq!(c.footer_totals(), vec!["15".to_string()]);

    let command = c.update(restore("1")).unwrap();
    assert_eq!(
        command,
        Command::Emit(TableEvent::RowActivated {
            token: "1".to_string()
        })
    );
    assert_eq!(c.footer_totals(), vec!["35".to_string()]);
}

#[test]
fn test_archive_swaps_controls_for_text() {
    let mut c = controller(&lines(&[10, 20]));
    c.update(delete("0")).unwrap();

    let m = markup(&c);
    assert_eq!(m.count("tr.edit-row.archived"), 1);
    assert_eq!(m.hidden_value("Order.Lines[0].IsActive").as_deref(), Some("False"));
    assert_eq!(m.hidden_value("Order.Lines[0].IsDirty").as_deref(), Some("True"));
    let labels: Vec<String> = m
        .select("tr.archived .archive-text")
        .into_iter()
        .map(|e| e.text().collect())
        .collect();
    assert_eq!(labels, vec!["Widget", "10", "12.50", "Open", ""]);
    assert_eq!(m.count(r#"tr.archived [style="display:none;"]"#), 5);
    assert!(c.row("0").unwrap().archived);
}

#[test]
fn test_archive_then_restore_only_leaves_row_dirty() {
    let mut c = controller(&lines(&[10, 20, 5]));
    let before = c.table().to_html();

    c.update(delete("1")).unwrap();
    c.update(restore("1")).unwrap();

    let expected = before.replace(
        r#"name="Order.Lines[1].IsDirty" value="False""#,
        r#"name="Order.Lines[1].IsDirty" value="True""#,
    );
    assert_ne!(expected, before);
    assert_eq!(c.table().to_html(), expected);
    let row = c.row("1").unwrap();
    assert!(!row.archived && row.dirty);
}

#[test]
fn test_delete_of_archived_row_restores_it() {
    let model = Value::List(vec![line(1, "A", 10, true), line(2, "B", 20, false)]);
    let mut c = controller(&model);
    c.update(delete("1")).unwrap();
    let m = markup(&c);
    assert_eq!(m.count("tr.archived"), 0);
    assert_eq!(m.count(".archive-text"), 0);
    assert_eq!(m.hidden_value("Order.Lines[1].IsActive").as_deref(), Some("True"));
    assert_eq!(c.footer_totals(), vec!["30".to_string()]);
}

#[test]
fn test_restore_of_active_row_is_a_no_op() {
    let mut c = controller(&lines(&[10]));
    assert!(c.update(restore("0")).unwrap().is_none());
    assert!(!c.row("0").unwrap().dirty);
}

// =============================================================================
// Field changes
// =============================================================================

#[test]
fn test_dirty_flag_follows_values() {
    let mut c = controller(&lines(&[10, 20]));

    c.update(change("Order.Lines[0].Qty", "11")).unwrap();
    assert_eq!(markup(&c).hidden_value("Order.Lines[0].IsDirty").as_deref(), Some("True"));
    assert!(c.row("0").unwrap().dirty);
    assert_eq!(c.footer_totals(), vec!["31".to_string()]);

    c.update(change("Order.Lines[0].Qty", "10")).unwrap();
    assert_eq!(markup(&c).hidden_value("Order.Lines[0].IsDirty").as_deref(), Some("False"));
    assert!(!c.row("0").unwrap().dirty);
    assert_eq!(c.footer_totals(), vec!["30".to_string()]);
}

#[test]
fn test_select_change_marks_dirty() {
    let mut c = controller(&lines(&[1]));
    c.update(change("Order.Lines[0].Status", "Shipped")).unwrap();
    let m = markup(&c);
    assert_eq!(m.text(r#"select[name="Order.Lines[0].Status"] option[selected]"#).as_deref(), Some("Shipped"));
    assert_eq!(m.hidden_value("Order.Lines[0].IsDirty").as_deref(), Some("True"));
}

#[test]
fn test_change_rejections() {
    let mut c = controller(&lines(&[10, 20]));
    assert_eq!(
        c.update(change("Order.Lines[9].Qty", "1")).unwrap_err(),
        ClientError::UnknownControl("Order.Lines[9].Qty".to_string())
    );
    assert_eq!(
        c.update(delete("9")).unwrap_err(),
        ClientError::UnknownRow("9".to_string())
    );
    c.update(delete("1")).unwrap();
    assert_eq!(
        c.update(change("Order.Lines[1].Qty", "1")).unwrap_err(),
        ClientError::RowArchived("1".to_string())
    );
}

fn cost_type() -> std::sync::Arc<TypeDescriptor> {
    TypeDescriptor::builder("Line")
        .property(PropertyDescriptor::integer("Qty"))
        .property(
            PropertyDescriptor::decimal("Cost")
                .format("{0:C}")
                .read_only()
                .column(TableColumn::default().total()),
        )
        .edit(TableEdit::default())
        .build()
        .unwrap()
}

fn costs(values: &[i64]) -> Value {
    Value::List(
        values
            .iter()
            .map(|v| Value::object([("Qty", Value::from(1)), ("Cost", Value::from(*v))]))
            .collect(),
    )
}

#[test]
fn test_read_only_totals_use_raw_values() {
    let ty = cost_type();
    let mut c = TableController::attach(
        edit_table(&ty, &costs(&[1000, 234])),
        &Behavior::ALL,
        &RenderOptions::default(),
    )
    .unwrap();
    let before = c.table().to_html();
    assert_eq!(c.footer_totals(), vec!["$1,234.00".to_string()]);

    c.update(TableMessage::AddRow).unwrap();
    assert_eq!(c.footer_totals(), vec!["$1,234.00".to_string()]);
    c.update(delete("2")).unwrap();
    assert_eq!(c.table().to_html(), before);

    c.update(delete("0")).unwrap();
    assert_eq!(c.footer_totals(), vec!["$234.00".to_string()]);
    c.update(restore("0")).unwrap();
    assert_eq!(c.footer_totals(), vec!["$1,234.00".to_string()]);
}

#[test]
fn test_total_overflow_saturates() {
    let ty = TypeDescriptor::builder("Line")
        .property(PropertyDescriptor::decimal("Cost").column(TableColumn::default().total()))
        .edit(TableEdit::default())
        .build()
        .unwrap();
    let model = Value::List(vec![
        Value::object([("Cost", Value::from(1))]),
        Value::object([("Cost", Value::from(1))]),
    ]);
    let mut c =
        TableController::attach(edit_table(&ty, &model), &Behavior::ALL, &RenderOptions::default())
            .unwrap();
    let max = "79228162514264337593543950335";
    c.update(TableMessage::ChangeValue {
        name: "Lines[0].Cost".to_string(),
        value: max.to_string(),
    })
    .unwrap();
    c.update(TableMessage::ChangeValue {
        name: "Lines[1].Cost".to_string(),
        value: max.to_string(),
    })
    .unwrap();
    let saturated = c.footer_totals();

    c.update(TableMessage::ChangeValue {
        name: "Lines[1].Cost".to_string(),
        value: "0".to_string(),
    })
    .unwrap();
    assert_eq!(c.footer_totals(), saturated);
}

#[test]
fn test_totals_follow_rounding_option() {
    let options = RenderOptions {
        rounding: Some(0),
        ..RenderOptions::default()
    };
    let mut c = TableController::attach(table_for(&lines(&[10, 20, 5])), &Behavior::ALL, &options).unwrap();
    c.update(change("Order.Lines[1].Qty", "2.5")).unwrap();
    assert_eq!(c.footer_totals(), vec!["18".to_string()]);
}

// =============================================================================
// Submit
// =============================================================================

#[test]
fn test_submit_drops_template_and_flags_archived_rows() {
    let mut c = controller(&lines(&[10, 20]));
    c.update(delete("1")).unwrap();
    c.update(change("Order.Lines[1].Qty", "1")).unwrap_err();

    let Command::Submit { payload } = c.update(TableMessage::Submit).unwrap() else {
        panic!("expected a submit command");
    };
    assert!(payload.iter().all(|(name, _)| !name.contains("[#]")));
    let value = |name: &str| {
        payload
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    };
    assert_eq!(value("Order.Lines[1].IsActive"), Some("False"));
    assert_eq!(value("Order.Lines[1].IsDirty"), Some("True"));
    assert_eq!(value("Order.Lines[0].IsDirty"), Some("False"));
    assert_eq!(value("Order.Lines[0].Qty"), Some("10"));
    assert_eq!(value("Order.Lines[0].Status"), Some("Open"));
    assert_eq!(
        payload
            .iter()
            .filter(|(n, _)| n == "Order.Lines.Index")
            .count(),
        2
    );

    assert_eq!(markup(&c).count(".template-body"), 0);
    assert_eq!(
        c.update(TableMessage::AddRow).unwrap_err(),
        ClientError::MissingTemplate
    );
}

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_registry_attaches_once_per_table() {
    let mut registry = TableRegistry::new();
    assert!(registry.is_empty());

    registry
        .attach(table_for(&lines(&[1, 2, 3])), &Behavior::ALL, &RenderOptions::default())
        .unwrap()
        .update(TableMessage::AddRow)
        .unwrap();
    let again = registry
        .attach(table_for(&lines(&[1])), &Behavior::ALL, &RenderOptions::default())
        .unwrap();
    assert_eq!(again.row_tokens(), vec!["0", "1", "2", "3"]);
    assert_eq!(registry.len(), 1);

    assert!(registry.get("Order_Lines").is_some());
    assert!(registry.detach("Order_Lines").is_some());
    assert!(registry.get_mut("Order_Lines").is_none());
}

#[test]
fn test_registry_does_not_keep_failed_attach() {
    let mut registry = TableRegistry::new();
    let err = registry
        .attach(table_for(&lines(&[1])), &[], &RenderOptions::default())
        .unwrap_err();
    assert_eq!(err, ClientError::MissingEnhancement(Behavior::NumericInput));
    assert!(registry.is_empty());
}
