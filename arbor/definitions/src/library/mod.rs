//! Lending library model.
//!
//! A small but complete tree exercising every method strategy, literal and
//! parameterized locators, and a base service shared by two collections.
//!
//! ```text
//! Library (root)
//! ├── books    -> Books   (extends Catalog)
//! │   └── {id} -> Book
//! └── authors  -> Authors (extends Catalog)
//!     └── {id} -> Author
//! ```

use arbor_define::{Locator, Method, Model, Parameter, Service, Type};

/// Creates the library model.
///
/// ## Services
///
/// - `Library` - root, locates `Books` and `Authors`
/// - `Catalog` - base of both collections, with a `Reindex` action
/// - `Books` - `Add`, `List`, and a `Book` locator keyed by id
/// - `Book` - `Get`, `Update`, `Remove`, and the `CheckOut` / `Return` actions
/// - `Authors` - `Add`, `List`, and an `Author` locator keyed by id
/// - `Author` - `Get` and `Remove`
///
/// ## Examples
///
/// ```rust
/// use arbor_define::Name;
/// use arbor_definitions::library::define_library_model;
///
/// let model = define_library_model();
/// let books = model.find_service(&Name::parse("Books")).unwrap();
/// assert_eq!(books.base, Some(Name::parse("Catalog")));
/// ```
pub fn define_library_model() -> Model {
    Model::new("Library", "Library")
        .service(
            Service::new("Library")
                .with_doc("Entry point of the lending library API.")
                .locator(Locator::new("Books", "Books"))
                .locator(Locator::new("Authors", "Authors")),
        )
        .service(
            Service::new("Catalog")
                .with_doc("Behavior shared by every catalog collection.")
                .method(
                    Method::new("Reindex")
                        .with_doc("Rebuilds the search index of the collection.")
                        .param(Parameter::input("full", Type::boolean()))
                        .param(Parameter::output("job", Type::structure("Job"))),
                ),
        )
        .service(
            Service::new("Books")
                .extends("Catalog")
                .with_doc("The books held by the library.")
                .method(
                    Method::new("Add")
                        .param(Parameter::in_out("book", Type::structure("Book")))
                        .param(Parameter::input("notify", Type::boolean())),
                )
                .method(
                    Method::new("List")
                        .with_doc("Returns the books matching the given criteria.")
                        .param(Parameter::output("books", Type::list(Type::structure("Book"))))
                        .param(Parameter::input("search", Type::string()))
                        .param(Parameter::input("max", Type::integer())),
                )
                .locator(
                    Locator::new("Book", "Book")
                        .with_parameter(Parameter::input("id", Type::string())),
                ),
        )
        .service(
            Service::new("Book")
                .method(Method::new("Get").param(Parameter::output("book", Type::structure("Book"))))
                .method(
                    Method::new("Update")
                        .param(Parameter::in_out("book", Type::structure("Book")))
                        .param(Parameter::input("notify", Type::boolean())),
                )
                .method(Method::new("Remove").param(Parameter::input("force", Type::boolean())))
                .method(
                    Method::new("CheckOut")
                        .with_doc("Lends the book to a member.")
                        .param(Parameter::input("member", Type::structure("Member")))
                        .param(Parameter::input("due", Type::date()))
                        .param(Parameter::output("loan", Type::structure("Loan"))),
                )
                .method(Method::new("Return").param(Parameter::input("condition", Type::string()))),
        )
        .service(
            Service::new("Authors")
                .extends("Catalog")
                .method(
                    Method::new("Add")
                        .param(Parameter::in_out("author", Type::structure("Author"))),
                )
                .method(
                    Method::new("List")
                        .param(Parameter::output("authors", Type::list(Type::structure("Author")))),
                )
                .locator(
                    Locator::new("Author", "Author")
                        .with_parameter(Parameter::input("id", Type::string())),
                ),
        )
        .service(
            Service::new("Author")
                .method(
                    Method::new("Get").param(Parameter::output("author", Type::structure("Author"))),
                )
                .method(Method::new("Remove")),
        )
}
