use pulse_core::write::insight_schema;

/// Print the fixed output column schema — the contract the downstream
/// catalog table is defined against.
pub fn run() -> anyhow::Result<()> {
    let schema = insight_schema();
    for field in schema.fields() {
        println!("{:<26} {}", field.name(), field.data_type());
    }
    Ok(())
}
