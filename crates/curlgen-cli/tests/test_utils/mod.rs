//! Test utilities for curlgen integration tests

// Internal imports (std, crate)
use std::fs;
use std::path::{Path, PathBuf};

// External imports (alphabetized)
use anyhow::Context;
use tempfile::TempDir;

/// Creates a temporary directory for test outputs
pub fn create_temp_dir() -> anyhow::Result<(TempDir, PathBuf)> {
    let temp_dir = tempfile::tempdir()?;
    let temp_path = temp_dir.path().to_path_buf();
    Ok((temp_dir, temp_path))
}

/// Creates a test OpenAPI spec file in the given directory
pub fn create_test_openapi_spec(dir: &Path) -> anyhow::Result<PathBuf> {
    let spec_path = dir.join("openapi.yaml");
    let spec_content = r#"
openapi: 3.0.0
info:
  title: Test API
  version: 1.0.0
  description: Test API for curlgen integration tests

servers:
  - url: http://localhost:8080/api/v1
    description: Development server

paths:
  /pets:
    get:
      operationId: listPets
      summary: List all pets
      description: Returns all pets from the system that the user has access to
      parameters:
        - $ref: '#/components/parameters/limitParam'
        - name: X-Request-Id
          in: header
          schema:
            type: string
      responses:
        '200':
          description: A list of pets
    post:
      operationId: addPet
      summary: Add a new pet
      requestBody:
        required: true
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Pet'
      responses:
        '201':
          description: Created
  /pets/{petId}:
    get:
      operationId: getPetById
      summary: Find pet by ID
      parameters:
        - name: petId
          in: path
          required: true
          description: ID of pet to return
          schema:
            type: integer
      responses:
        '200':
          description: A pet

components:
  parameters:
    limitParam:
      name: limit
      in: query
      description: Maximum number of items to return
      required: false
      schema:
        type: integer
        default: 20
  schemas:
    Pet:
      type: object
      required:
        - name
      properties:
        name:
          type: string
          example: doggie
        tag:
          type: string
"#;

    fs::write(&spec_path, spec_content)
        .with_context(|| format!("Failed to write test spec to {}", spec_path.display()))?;
    Ok(spec_path)
}

/// Asserts that a file exists and contains the expected content
pub fn assert_file_contains(path: &Path, expected_content: &str) -> anyhow::Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    assert!(
        content.contains(expected_content),
        "File {} does not contain expected content: {}\n---\n{}",
        path.display(),
        expected_content,
        content
    );

    Ok(())
}

/// Sorted names of the files in a directory
pub fn list_files(dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut names = fs::read_dir(dir)?
        .map(|entry| Ok(entry?.file_name().to_string_lossy().into_owned()))
        .collect::<anyhow::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}
