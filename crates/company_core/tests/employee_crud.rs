use company_core::db::open_db_in_memory;
use company_core::{
    Department, DepartmentRef, DepartmentRepository, Employee, EmployeeFilter,
    EmployeeRepository, EmployeeService, EmployeeUpdate, RepoError, SqliteDepartmentRepository,
    SqliteEmployeeRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

const MARKETING_ID: &str = "5d9f1140-f10a-4121-86cf-d44050000405";

fn seed(repo: &SqliteEmployeeRepository<'_>, rows: &[(&str, &str, &str)]) {
    for (first_name, last_name, department) in rows {
        let employee = Employee::new(*first_name, *last_name, *department).unwrap();
        repo.insert_employee(&employee).unwrap();
    }
}

fn service(
    conn: &Connection,
) -> EmployeeService<SqliteEmployeeRepository<'_>, SqliteDepartmentRepository<'_>> {
    EmployeeService::new(
        SqliteEmployeeRepository::try_new(conn).unwrap(),
        SqliteDepartmentRepository::try_new(conn).unwrap(),
    )
}

#[test]
fn find_returns_all_and_find_one_matches_every_field() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    seed(
        &repo,
        &[
            ("Amanda", "Doe", "Marketing"),
            ("Jonathan", "Wilson", "Management"),
        ],
    );

    assert_eq!(repo.find_employees(&EmployeeFilter::all()).unwrap().len(), 2);

    let employee = repo
        .find_employee(&EmployeeFilter::by_record("Amanda", "Doe", "Marketing"))
        .unwrap()
        .unwrap();
    assert_eq!(employee.first_name, "Amanda");
    assert_eq!(employee.last_name, "Doe");
    assert_eq!(employee.department, DepartmentRef::Label("Marketing".to_string()));
}

#[test]
fn insert_then_get_roundtrips_all_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();

    let employee = Employee::new("Amanda", "Doe", "Marketing").unwrap();
    let id = repo.insert_employee(&employee).unwrap();

    assert_eq!(repo.get_employee(id).unwrap(), Some(employee));
}

#[test]
fn update_one_and_save_change_a_single_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    seed(
        &repo,
        &[
            ("Amanda", "Doe", "Marketing"),
            ("Jonathan", "Wilson", "Management"),
        ],
    );

    let changed = repo
        .update_employee(
            &EmployeeFilter::by_first_name("Amanda"),
            &EmployeeUpdate::set_first_name("Mark"),
        )
        .unwrap();
    assert_eq!(changed, 1);
    assert_eq!(
        repo.find_employees(&EmployeeFilter::by_first_name("Mark"))
            .unwrap()
            .len(),
        1
    );

    let mut jonathan = repo
        .find_employee(&EmployeeFilter::by_first_name("Jonathan"))
        .unwrap()
        .unwrap();
    jonathan.first_name = "John".to_string();
    repo.save_employee(&jonathan).unwrap();
    assert!(repo
        .find_employee(&EmployeeFilter::by_first_name("John"))
        .unwrap()
        .is_some());
}

#[test]
fn update_many_without_filter_updates_every_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    seed(
        &repo,
        &[
            ("Amanda", "Doe", "Marketing"),
            ("Jonathan", "Wilson", "Management"),
        ],
    );

    let changed = repo
        .update_employees(
            &EmployeeFilter::all(),
            &EmployeeUpdate::set_first_name("updatedMany"),
        )
        .unwrap();
    assert_eq!(changed, 2);
    assert_eq!(
        repo.find_employees(&EmployeeFilter::by_first_name("updatedMany"))
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn blank_patch_fields_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    seed(&repo, &[("Amanda", "Doe", "Marketing")]);

    let update = EmployeeUpdate {
        last_name: Some("   ".to_string()),
        department: Some(DepartmentRef::Label(String::new())),
        ..EmployeeUpdate::default()
    };
    let err = repo
        .update_employees(&EmployeeFilter::all(), &update)
        .unwrap_err();
    match err {
        RepoError::Validation(errors) => {
            assert!(errors.contains("lastName"));
            assert!(errors.contains("department"));
            assert!(!errors.contains("firstName"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn delete_one_remove_and_delete_many() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    seed(
        &repo,
        &[
            ("Amanda", "Doe", "Marketing"),
            ("Jonathan", "Wilson", "Management"),
            ("Thomas", "Jefferson", "Management"),
            ("Emma", "Cowell", "Management"),
        ],
    );

    let removed = repo
        .delete_employee(&EmployeeFilter::by_record("Amanda", "Doe", "Marketing"))
        .unwrap();
    assert_eq!(removed, 1);
    assert!(repo
        .find_employee(&EmployeeFilter::by_record("Amanda", "Doe", "Marketing"))
        .unwrap()
        .is_none());

    let jonathan = repo
        .find_employee(&EmployeeFilter::by_record("Jonathan", "Wilson", "Management"))
        .unwrap()
        .unwrap();
    repo.delete_employee_by_id(jonathan.id).unwrap();
    assert!(repo
        .find_employee(&EmployeeFilter::by_record("Jonathan", "Wilson", "Management"))
        .unwrap()
        .is_none());

    let management = EmployeeFilter {
        department: Some(DepartmentRef::from("Management")),
        ..EmployeeFilter::default()
    };
    assert_eq!(repo.count_employees(&management).unwrap(), 2);

    assert_eq!(repo.delete_employees(&EmployeeFilter::all()).unwrap(), 2);
    assert!(repo.find_employees(&EmployeeFilter::all()).unwrap().is_empty());
}

#[test]
fn populate_resolves_department_by_id() {
    let conn = open_db_in_memory().unwrap();
    let department_id = Uuid::parse_str(MARKETING_ID).unwrap();
    let departments = SqliteDepartmentRepository::try_new(&conn).unwrap();
    departments
        .insert_department(&Department::with_id(department_id, "Marketing").unwrap())
        .unwrap();

    let service = service(&conn);
    service
        .create_employee("Amanda", "Doe", MARKETING_ID)
        .unwrap();

    let employee = service
        .find_one_populated(&EmployeeFilter::by_record("Amanda", "Doe", MARKETING_ID))
        .unwrap()
        .unwrap();
    assert_eq!(employee.first_name, "Amanda");
    assert_eq!(employee.last_name, "Doe");
    let department = employee.department.unwrap();
    assert_eq!(department.id, department_id);
    assert_eq!(department.name, "Marketing");
}

#[test]
fn populate_leaves_label_references_unresolved() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    service.create_employee("Amanda", "Doe", "Marketing").unwrap();

    let populated = service.find_populated(&EmployeeFilter::all()).unwrap();
    assert_eq!(populated.len(), 1);
    assert!(populated[0].department.is_none());
    assert_eq!(
        populated[0].department_ref,
        DepartmentRef::Label("Marketing".to_string())
    );
}

#[test]
fn populate_reports_dangling_id_reference() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let employee = service
        .create_employee("Amanda", "Doe", MARKETING_ID)
        .unwrap();

    let err = service.populate(employee).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound { entity: "department", id } if id.to_string() == MARKETING_ID
    ));
}

#[test]
fn populated_employee_serializes_nested_department() {
    let conn = open_db_in_memory().unwrap();
    let department = Department::new("Marketing").unwrap();
    SqliteDepartmentRepository::try_new(&conn)
        .unwrap()
        .insert_department(&department)
        .unwrap();

    let service = service(&conn);
    let employee = service.create_employee("Amanda", "Doe", &department).unwrap();
    let populated = service.populate(employee).unwrap();

    let value = serde_json::to_value(&populated).unwrap();
    assert_eq!(value["firstName"], "Amanda");
    assert_eq!(value["department"]["name"], "Marketing");
    assert_eq!(value["department"]["_id"], department.id.to_string());
}

#[test]
fn repository_rejects_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE employees (
            id TEXT PRIMARY KEY NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL
        );",
    )
    .unwrap();
    conn.execute_batch(&format!(
        "PRAGMA user_version = {};",
        company_core::db::migrations::latest_version()
    ))
    .unwrap();

    let result = SqliteEmployeeRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::MissingRequiredColumn {
            table: "employees",
            column: "department"
        })
    ));
}

#[test]
fn save_and_filters_trim_padded_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    seed(&repo, &[("Amanda", "Doe", "Marketing")]);

    let mut amanda = repo
        .find_employee(&EmployeeFilter::by_first_name("Amanda"))
        .unwrap()
        .unwrap();
    amanda.first_name = "  Mandy ".to_string();
    amanda.last_name = " Smith".to_string();
    amanda.department = DepartmentRef::Label("  Sales  ".to_string());
    repo.save_employee(&amanda).unwrap();

    let stored: (String, String, String) = conn
        .query_row(
            "SELECT first_name, last_name, department FROM employees WHERE id = ?1",
            [amanda.id.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!(
        stored,
        ("Mandy".to_string(), "Smith".to_string(), "Sales".to_string())
    );

    let found = repo
        .find_employee(&EmployeeFilter::by_record("Mandy", "Smith", "Sales"))
        .unwrap()
        .unwrap();
    assert_eq!(found.id, amanda.id);
    assert_eq!(
        repo.count_employees(&EmployeeFilter::by_first_name(" Mandy "))
            .unwrap(),
        1
    );
}

#[test]
fn nil_department_id_is_rejected_on_every_write_path() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteEmployeeRepository::try_new(&conn).unwrap();
    seed(&repo, &[("Amanda", "Doe", "Marketing")]);

    let mut amanda = repo
        .find_employee(&EmployeeFilter::by_first_name("Amanda"))
        .unwrap()
        .unwrap();
    amanda.department = DepartmentRef::Id(Uuid::nil());
    let err = repo.save_employee(&amanda).unwrap_err();
    assert!(matches!(err, RepoError::Validation(ref errors) if errors.contains("department")));

    let patch = EmployeeUpdate {
        department: Some(DepartmentRef::Id(Uuid::nil())),
        ..EmployeeUpdate::default()
    };
    let err = repo
        .update_employees(&EmployeeFilter::all(), &patch)
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    let stored = repo
        .find_employee(&EmployeeFilter::by_first_name("Amanda"))
        .unwrap()
        .unwrap();
    assert_eq!(stored.department, DepartmentRef::Label("Marketing".to_string()));
}
