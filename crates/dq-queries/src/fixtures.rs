//! Test records shared by the unit tests of this crate

use std::sync::LazyLock;

use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::schema::{EnumDescriptor, FieldType, QueryEnum, Record, Schema};
use crate::value::{EnumValue, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Developer,
    Manager,
    Analyst,
}

impl QueryEnum for Role {
    const DESCRIPTOR: &'static EnumDescriptor =
        &EnumDescriptor::new("Role", &["Developer", "Manager", "Analyst"]);

    fn ordinal(&self) -> u32 {
        *self as u32
    }
}

#[derive(Debug, Clone)]
pub struct Address {
    pub street: String,
    pub city: String,
}

#[derive(Debug, Clone)]
pub struct Company {
    pub name: String,
    pub address: Address,
}

#[derive(Debug, Clone)]
pub struct Employee {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub salary: Decimal,
    pub hired_at: DateTime<Utc>,
    pub active: bool,
    pub role: Role,
    pub company: Company,
    pub manager: Option<Box<Employee>>,
    pub tags: Vec<String>,
}

static ADDRESS_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("Address")
        .field("Street", FieldType::Text)
        .field("City", FieldType::Text)
        .build()
});

static COMPANY_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("Company")
        .field("Name", FieldType::Text)
        .object("Address", Address::schema)
        .build()
});

static EMPLOYEE_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder("Employee")
        .field("Id", FieldType::Int32)
        .field("FirstName", FieldType::Text)
        .field("LastName", FieldType::Text)
        .field("Salary", FieldType::Decimal)
        .field("HiredAt", FieldType::DateTime)
        .field("Active", FieldType::Bool)
        .enumeration::<Role>("Role")
        .object("Company", Company::schema)
        .object("Manager", Employee::schema)
        .field("Tags", FieldType::Unsupported("list"))
        .build()
});

impl Record for Address {
    fn schema() -> &'static Schema {
        &ADDRESS_SCHEMA
    }

    fn value(&self, field: &str) -> Value<'_> {
        match field {
            "Street" => Value::from(&self.street),
            "City" => Value::from(&self.city),
            _ => Value::Null,
        }
    }
}

impl Record for Company {
    fn schema() -> &'static Schema {
        &COMPANY_SCHEMA
    }

    fn value(&self, field: &str) -> Value<'_> {
        match field {
            "Name" => Value::from(&self.name),
            _ => Value::Null,
        }
    }

    fn nested(&self, field: &str) -> Option<&dyn Record> {
        match field {
            "Address" => Some(&self.address),
            _ => None,
        }
    }
}

impl Record for Employee {
    fn schema() -> &'static Schema {
        &EMPLOYEE_SCHEMA
    }

    fn value(&self, field: &str) -> Value<'_> {
        match field {
            "Id" => Value::from(self.id),
            "FirstName" => Value::from(&self.first_name),
            "LastName" => Value::from(&self.last_name),
            "Salary" => Value::from(self.salary),
            "HiredAt" => Value::from(self.hired_at),
            "Active" => Value::from(self.active),
            "Role" => Value::from(EnumValue::of(&self.role)),
            _ => Value::Null,
        }
    }

    fn nested(&self, field: &str) -> Option<&dyn Record> {
        match field {
            "Company" => Some(&self.company),
            "Manager" => self.manager.as_deref().map(|m| m as &dyn Record),
            _ => None,
        }
    }
}

fn global_company() -> Company {
    Company {
        name: "Global Company".to_string(),
        address: Address {
            street: "1 Main Street".to_string(),
            city: "Springfield".to_string(),
        },
    }
}

fn local_company() -> Company {
    Company {
        name: "Local Company".to_string(),
        address: Address {
            street: "42 Side Road".to_string(),
            city: "Shelbyville".to_string(),
        },
    }
}

fn employee(id: i32, first_name: &str, last_name: &str, salary: i64, company: Company, role: Role) -> Employee {
    let base = Utc.with_ymd_and_hms(2020, 1, 6, 9, 0, 0).single().unwrap_or_default();
    Employee {
        id,
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        salary: Decimal::from(salary),
        hired_at: base + Duration::days(i64::from(id) * 17),
        active: id % 5 != 0,
        role,
        company,
        manager: None,
        tags: vec![],
    }
}

/// 24 employees: 18 "Jo" names at Global Company earning more than 2500,
/// plus decoys that each fail exactly one of those conditions
pub fn employees() -> Vec<Employee> {
    let alice = employee(1, "Alice", "Anderson", 5000, global_company(), Role::Manager);
    let bob = employee(2, "Bob", "Brown", 3000, global_company(), Role::Manager);

    let jo_names = [
        ("Jody", "Jackson"),
        ("Joel", "Nilsson"),
        ("Joan", "Miller"),
        ("Joshua", "Wright"),
        ("Joy", "Turner"),
        ("Jocelyn", "Harris"),
        ("John", "Smith"),
        ("Jonas", "Berg"),
        ("Jose", "Garcia"),
        ("Joanna", "Lee"),
        ("Jolene", "Parton"),
        ("Josh", "Young"),
        ("Joey", "King"),
        ("Jordan", "Hill"),
        ("Joseph", "Clark"),
        ("Jonah", "Baker"),
        ("Johnny", "Walker"),
        ("Joe", "Davis"),
    ];

    let mut rows = vec![alice.clone()];
    for (i, (first, last)) in jo_names.iter().enumerate() {
        let id = 3 + i as i32;
        let role = if i % 3 == 0 { Role::Analyst } else { Role::Developer };
        let mut row = employee(id, first, last, 2600 + 100 * i as i64, global_company(), role);
        if i % 2 == 0 {
            row.manager = Some(Box::new(alice.clone()));
            row.tags = vec!["onsite".to_string()];
        } else {
            row.manager = Some(Box::new(bob.clone()));
        }
        rows.push(row);
    }

    rows.push(bob);
    rows.push(employee(21, "Jonathan", "Stevenson", 2500, global_company(), Role::Developer));
    let mut josephine = employee(22, "Josephine", "Olsen", 4500, local_company(), Role::Manager);
    josephine.manager = Some(Box::new(alice));
    rows.push(josephine);
    rows.push(employee(23, "Mary", "Johnson", 1500, local_company(), Role::Analyst));
    rows.push(employee(24, "jordan", "Lowe", 5000, global_company(), Role::Developer));
    rows
}
