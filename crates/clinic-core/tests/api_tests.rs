//! Tests for the FFI-facing `ClinicCore` object.

use clinic_core::{
    open_database, open_database_in_memory, ClinicError, FfiPrescriptionLine, FfiReceiptKind,
};

#[test]
fn test_visit_to_receipt() {
    let core = open_database_in_memory().unwrap();
    let clinic = core
        .create_clinic(
            "Terra Natural Herbs".to_string(),
            "P.O.BOX 222, Arusha, Arusha".to_string(),
            "(123) 456-7890".to_string(),
            Some("www.terranaturalherbs.co.tz".to_string()),
        )
        .unwrap();
    let patient = core
        .create_patient(
            "Baraka".to_string(),
            "Lyimo".to_string(),
            30,
            "male".to_string(),
            "0755".to_string(),
            Some(clinic.clinic_id),
        )
        .unwrap();
    let medicine = core.add_medicine("Metformin".to_string(), 2500).unwrap();
    core.add_stock(clinic.clinic_id, medicine.medicine_id, 50)
        .unwrap();

    core.record_diagnosis(
        patient.patient_id.clone(),
        vec!["Diabetes".to_string()],
        "Type 2".to_string(),
    )
    .unwrap();
    core.record_prescription(
        patient.patient_id.clone(),
        vec![FfiPrescriptionLine {
            medicine_id: medicine.medicine_id,
            quantity: 3,
            dosage: Some("with meals".to_string()),
        }],
        "Reduce sugar".to_string(),
    )
    .unwrap();
    core.record_lab_analysis(
        patient.patient_id.clone(),
        "Fasting glucose".to_string(),
        "8.1 mmol/L".to_string(),
    )
    .unwrap();

    let doc = core
        .export_receipt(
            patient.patient_id.clone(),
            FfiReceiptKind::PaymentReceipt,
            Some(clinic.clinic_id),
        )
        .unwrap();

    assert!(doc.filename.starts_with("payment-receipt-Baraka_Lyimo-"));
    assert!(doc.filename.ends_with(".pdf"));
    assert_eq!(doc.content_type, "application/pdf");
    assert_eq!(doc.page_count, 1);
    assert!(doc.bytes.starts_with(b"%PDF"));
}

#[test]
fn test_inventory_through_api() {
    let core = open_database_in_memory().unwrap();
    let clinic = core
        .create_clinic(
            "Clinic".to_string(),
            "Address".to_string(),
            "0700".to_string(),
            None,
        )
        .unwrap();
    let medicine = core.add_medicine("Zinc".to_string(), 150).unwrap();

    let first = core
        .add_stock(clinic.clinic_id, medicine.medicine_id, 20)
        .unwrap();
    core.add_stock(clinic.clinic_id, medicine.medicine_id, 30)
        .unwrap();

    let lines = core.list_inventory(clinic.clinic_id).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].quantity, 50);

    let history = core.inventory_history(first.inventory_id).unwrap();
    assert_eq!(history.len(), 2);

    let err = core
        .add_stock(clinic.clinic_id, medicine.medicine_id, 0)
        .unwrap_err();
    assert!(matches!(err, ClinicError::InvalidInput(_)));
}

#[test]
fn test_rejected_stock_creates_no_inventory_row() {
    let core = open_database_in_memory().unwrap();
    let clinic = core
        .create_clinic(
            "Clinic".to_string(),
            "Address".to_string(),
            "0700".to_string(),
            None,
        )
        .unwrap();
    let medicine = core.add_medicine("Iodine".to_string(), 90).unwrap();

    for amount in [0, -5] {
        let err = core
            .add_stock(clinic.clinic_id, medicine.medicine_id, amount)
            .unwrap_err();
        assert!(matches!(err, ClinicError::InvalidInput(_)));
    }

    assert!(core.list_inventory(clinic.clinic_id).unwrap().is_empty());
}

#[test]
fn test_errors_map_to_ffi_variants() {
    let core = open_database_in_memory().unwrap();

    let err = core
        .export_receipt("nobody".to_string(), FfiReceiptKind::Appointment, None)
        .unwrap_err();
    assert!(matches!(err, ClinicError::NotFound(_)));

    let err = core
        .record_prescription(
            "nobody".to_string(),
            vec![FfiPrescriptionLine {
                medicine_id: 42,
                quantity: 1,
                dosage: None,
            }],
            String::new(),
        )
        .unwrap_err();
    assert!(matches!(err, ClinicError::NotFound(_)));

    assert!(core.get_patient("nobody".to_string()).unwrap().is_none());
}

#[test]
fn test_open_database_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clinic.db");
    let path = path.to_string_lossy().to_string();

    let patient_id = {
        let core = open_database(path.clone()).unwrap();
        core.create_patient(
            "Rehema".to_string(),
            "Swai".to_string(),
            27,
            "female".to_string(),
            "0788".to_string(),
            None,
        )
        .unwrap()
        .patient_id
    };

    let core = open_database(path).unwrap();
    let found = core.search_patients("Reh".to_string(), 10).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].patient_id, patient_id);
}
