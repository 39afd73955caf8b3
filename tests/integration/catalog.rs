//! Catalog operations driven over the memory store

use chrono::Utc;
use library_catalog::{
    error::AppError,
    models::BookStatus,
    services::{DeleteOutcome, FormOutcome},
    store::{Collection, EntityStore},
    validation::{AuthorForm, BookForm, BookInstanceForm, GenreForm},
};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

use crate::common::{catalog, redirected_id};

fn not_found_message(err: AppError) -> String {
    match err {
        AppError::NotFound(message) => message,
        other => panic!("expected not found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_book_list_uses_japanese_order_and_populates_authors() {
    let catalog = catalog();
    let soseki = catalog.author("漱石", "夏目").await;
    let ogai = catalog.author("鴎外", "森").await;
    catalog.book("ぶどう", soseki, &[]).await;
    catalog.book("アイス", ogai, &[]).await;
    catalog.book("かき", soseki, &[]).await;
    catalog.book("Zebra", ogai, &[]).await;

    let books = assert_ok!(catalog.services.books.list().await);
    let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Zebra", "アイス", "かき", "ぶどう"]);

    let author = books[1].author.as_ref().expect("author populated");
    assert_eq!(author.author.id, ogai);
    assert_eq!(author.name, "森, 鴎外");
    assert!(books.iter().all(|b| b.author.is_some()));
}

#[tokio::test]
async fn test_book_list_leaves_dangling_author_empty() {
    let catalog = catalog();
    let author = catalog.author("太宰", "治").await;
    catalog.book("斜陽", author, &[]).await;
    catalog
        .store
        .insert(
            Collection::Books,
            json!({
                "title": "人間失格",
                "author": Uuid::new_v4().to_string(),
                "summary": "s",
                "isbn": "i",
                "genre": [],
            }),
        )
        .await
        .unwrap();

    let books = assert_ok!(catalog.services.books.list().await);
    assert_eq!(books.len(), 2);
    let dangling = books.iter().find(|b| b.title == "人間失格").unwrap();
    assert!(dangling.author.is_none());

    let err = assert_err!(catalog.services.books.detail(dangling.id).await);
    assert_eq!(not_found_message(err), "no such author");
}

#[tokio::test]
async fn test_author_with_books_is_blocked_and_kept() {
    let catalog = catalog();
    let author = catalog.author("Ursula", "Le Guin").await;
    let other = catalog.author("Tove", "Jansson").await;
    let first = catalog.book("A Wizard of Earthsea", author, &[]).await;
    let second = catalog.book("The Tombs of Atuan", author, &[]).await;
    catalog.book("Moominsummer Madness", other, &[]).await;

    let outcome = assert_ok!(catalog.services.authors.delete(author).await);
    let DeleteOutcome::Blocked { view } = &outcome else {
        panic!("expected a blocked delete, got {:?}", outcome);
    };
    let mut blocking: Vec<Uuid> = view.author_books.iter().map(|b| b.item.id).collect();
    blocking.sort();
    let mut expected = vec![first, second];
    expected.sort();
    assert_eq!(blocking, expected);
    assert_eq!(view.author.name, "Le Guin, Ursula");

    let again = assert_ok!(catalog.services.authors.delete(author).await);
    assert_eq!(again, outcome);

    let detail = assert_ok!(catalog.services.authors.detail(author).await);
    assert_eq!(detail.author_books.len(), 2);
    assert_eq!(detail.author_books[0].url, format!("/catalog/book/{}", detail.author_books[0].item.id));
}

#[tokio::test]
async fn test_genre_delete_blocked_until_books_untagged() {
    let catalog = catalog();
    let author = catalog.author("Ray", "Bradbury").await;
    let genre = catalog.genre("Science Fiction").await;
    let book = catalog.book("Fahrenheit 451", author, &[genre]).await;

    let outcome = assert_ok!(catalog.services.genres.delete(genre).await);
    assert!(matches!(outcome, DeleteOutcome::Blocked { ref view } if view.genre_books.len() == 1));

    let form = BookForm {
        title: "Fahrenheit 451".to_string(),
        author: author.to_string(),
        summary: "Books burn".to_string(),
        isbn: "978-1451673319".to_string(),
        genre: Vec::new(),
    };
    let updated = assert_ok!(catalog.services.books.update(book, form).await);
    assert_eq!(updated, FormOutcome::Redirect(format!("/catalog/book/{}", book)));

    let outcome = assert_ok!(catalog.services.genres.delete(genre).await);
    assert_eq!(outcome.redirect(), Some("/catalog/genres"));
    assert!(matches!(outcome, DeleteOutcome::Executed { .. }));
}

#[tokio::test]
async fn test_delete_without_dependents_then_detail_is_not_found() {
    let catalog = catalog();
    let genre = catalog.genre("Poetry").await;

    let outcome = assert_ok!(catalog.services.genres.delete(genre).await);
    assert_eq!(
        outcome,
        DeleteOutcome::Executed {
            redirect: "/catalog/genres".to_string()
        }
    );

    let err = assert_err!(catalog.services.genres.detail(genre).await);
    assert_eq!(not_found_message(err), "no such genre");

    // Deleting what is already gone redirects without error
    let outcome = assert_ok!(catalog.services.genres.delete(genre).await);
    assert!(matches!(outcome, DeleteOutcome::Skipped { .. }));
    assert!(assert_ok!(catalog.services.genres.delete_form(genre).await).is_none());
}

#[tokio::test]
async fn test_author_round_trip_is_trimmed_and_escaped() {
    let catalog = catalog();
    let form = AuthorForm {
        first_name: "  Natsume ".to_string(),
        family_name: "<Soseki & Co>".to_string(),
        date_of_birth: "1867-02-09".to_string(),
        date_of_death: " ".to_string(),
    };
    let id = redirected_id(assert_ok!(catalog.services.authors.create(form).await));

    let detail = assert_ok!(catalog.services.authors.detail(id).await);
    let author = &detail.author;
    assert_eq!(author.author.first_name, "Natsume");
    assert_eq!(author.author.family_name, "&lt;Soseki &amp; Co&gt;");
    assert_eq!(author.author.date_of_death, None);
    assert_eq!(author.lifespan, "1867, 02, 09 -");
    assert_eq!(author.date_of_birth_yyyy_mm_dd.as_deref(), Some("1867-02-09"));
    assert_eq!(author.url, format!("/catalog/author/{}", id));
    assert!(detail.author_books.is_empty());
}

#[tokio::test]
async fn test_author_form_errors_keep_input() {
    let catalog = catalog();
    let form = AuthorForm {
        first_name: String::new(),
        family_name: "Austen".to_string(),
        date_of_birth: "someday".to_string(),
        date_of_death: String::new(),
    };
    let outcome = assert_ok!(catalog.services.authors.create(form).await);
    let FormOutcome::Invalid(view) = outcome else {
        panic!("expected the form back");
    };
    let fields: Vec<&str> = view.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["first_name", "date_of_birth"]);
    assert_eq!(view.author.family_name, "Austen");
    assert!(assert_ok!(catalog.services.authors.list().await).is_empty());
}

#[tokio::test]
async fn test_genre_with_existing_name_is_not_duplicated() {
    let catalog = catalog();
    let form = || GenreForm {
        name: "Fantasy".to_string(),
    };

    let created = assert_ok!(catalog.services.genres.create(form()).await);
    let FormOutcome::Redirect(url) = &created else {
        panic!("expected a redirect");
    };
    assert!(url.starts_with("/catalog/genre/"));

    let again = assert_ok!(catalog.services.genres.create(form()).await);
    assert_eq!(again, created);

    let genres = assert_ok!(catalog.services.genres.list().await);
    assert_eq!(genres.len(), 1);
    assert_eq!(&genres[0].url, url);
}

#[tokio::test]
async fn test_invalid_book_form_returns_input_and_pick_lists() {
    let catalog = catalog();
    catalog.author("Haruki", "Murakami").await;
    let fantasy = catalog.genre("Fantasy").await;
    catalog.genre("Mystery").await;

    let form = BookForm {
        title: String::new(),
        author: "a1".to_string(),
        summary: "s".to_string(),
        isbn: "123".to_string(),
        genre: vec![fantasy.to_string()],
    };
    let outcome = assert_ok!(catalog.services.books.create(form).await);
    let FormOutcome::Invalid(view) = outcome else {
        panic!("expected the form back");
    };

    assert_eq!(view.errors[0].field, "title");
    assert_eq!(view.errors[0].message, "Title must be specified.");
    assert_eq!(view.book.author, "a1");
    assert_eq!(view.book.summary, "s");
    assert_eq!(view.book.isbn, "123");
    assert_eq!(view.authors.len(), 1);
    let genres: Vec<(&str, bool)> = view
        .genres
        .iter()
        .map(|g| (g.genre.genre.name.as_str(), g.checked))
        .collect();
    assert_eq!(genres, vec![("Fantasy", true), ("Mystery", false)]);
    assert!(assert_ok!(catalog.services.books.list().await).is_empty());
}

#[tokio::test]
async fn test_book_referencing_missing_author_or_genre_is_rejected() {
    let catalog = catalog();
    let form = BookForm {
        title: "Ghost".to_string(),
        author: Uuid::new_v4().to_string(),
        summary: "s".to_string(),
        isbn: "i".to_string(),
        genre: vec![Uuid::new_v4().to_string()],
    };
    let outcome = assert_ok!(catalog.services.books.create(form).await);
    let FormOutcome::Invalid(view) = outcome else {
        panic!("expected the form back");
    };
    let fields: Vec<&str> = view.errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["author", "genre"]);
}

#[tokio::test]
async fn test_book_detail_and_update_form() {
    let catalog = catalog();
    let author = catalog.author("Mary", "Shelley").await;
    let horror = catalog.genre("Horror").await;
    let gothic = catalog.genre("Gothic").await;
    catalog.genre("Romance").await;
    let book = catalog.book("Frankenstein", author, &[horror, gothic, horror]).await;
    catalog.copy(book, "available").await;

    let detail = assert_ok!(catalog.services.books.detail(book).await);
    assert_eq!(detail.book.author.name, "Shelley, Mary");
    let genres: Vec<&str> = detail.book.genre.iter().map(|g| g.genre.name.as_str()).collect();
    assert_eq!(genres, vec!["Gothic", "Horror"]);
    assert_eq!(detail.book_instances.len(), 1);
    assert_eq!(detail.book_instances[0].status_label, BookStatus::Available.label());

    let form = assert_ok!(catalog.services.books.update_form(book).await);
    assert_eq!(form.book.title, "Frankenstein");
    let checked: Vec<&str> = form
        .genres
        .iter()
        .filter(|g| g.checked)
        .map(|g| g.genre.genre.name.as_str())
        .collect();
    assert_eq!(checked, vec!["Gothic", "Horror"]);

    let err = assert_err!(catalog.services.books.update_form(Uuid::new_v4()).await);
    assert_eq!(not_found_message(err), "no such book");
}

#[tokio::test]
async fn test_book_with_copies_is_blocked_until_copies_are_deleted() {
    let catalog = catalog();
    let author = catalog.author("Jules", "Verne").await;
    let book = catalog.book("Vingt mille lieues sous les mers", author, &[]).await;
    let copy = catalog.copy(book, "on_loan").await;

    let outcome = assert_ok!(catalog.services.books.delete(book).await);
    let DeleteOutcome::Blocked { view } = outcome else {
        panic!("expected a blocked delete");
    };
    assert_eq!(view.book.author.name, "Verne, Jules");
    assert_eq!(view.book_instances[0].instance.id, copy);

    let outcome = assert_ok!(catalog.services.book_instances.delete(copy).await);
    assert_eq!(outcome.redirect(), Some("/catalog/bookinstances"));
    let outcome = assert_ok!(catalog.services.books.delete(book).await);
    assert!(matches!(outcome, DeleteOutcome::Executed { .. }));

    let err = assert_err!(catalog.services.books.detail(book).await);
    assert_eq!(not_found_message(err), "no such book");
}

#[tokio::test]
async fn test_missing_book_instance_is_not_found() {
    let catalog = catalog();
    let err = assert_err!(catalog.services.book_instances.detail(Uuid::new_v4()).await);
    assert_eq!(not_found_message(err), "no such book instance");

    let outcome = assert_ok!(catalog.services.book_instances.delete(Uuid::new_v4()).await);
    assert!(matches!(outcome, DeleteOutcome::Skipped { .. }));
}

#[tokio::test]
async fn test_book_instance_defaults_and_population() {
    let catalog = catalog();
    let author = catalog.author("Yasunari", "Kawabata").await;
    let book = catalog.book("雪国", author, &[]).await;
    let copy = catalog.copy(book, "").await;

    let detail = assert_ok!(catalog.services.book_instances.detail(copy).await);
    let instance = detail.bookinstance;
    assert_eq!(instance.status, BookStatus::Processing);
    assert_eq!(instance.status_label, "準備中");
    assert_eq!(instance.due_back, Utc::now().date_naive());
    let linked = instance.book.expect("book populated");
    assert_eq!(linked.item.title, "雪国");
    assert_eq!(linked.url, format!("/catalog/book/{}", book));

    let form = assert_ok!(catalog.services.book_instances.update_form(copy).await);
    assert_eq!(form.selected_book, Some(book.to_string()));
    assert_eq!(form.book_list.len(), 1);
    assert_eq!(form.bookinstance.status, "processing");
}

#[tokio::test]
async fn test_book_instance_form_rejects_unknown_book() {
    let catalog = catalog();
    let author = catalog.author("Agatha", "Christie").await;
    catalog.book("Curtain", author, &[]).await;

    let form = BookInstanceForm {
        book: Uuid::new_v4().to_string(),
        imprint: "Collins".to_string(),
        status: "予約中".to_string(),
        due_back: "2030-01-31".to_string(),
    };
    let outcome = assert_ok!(catalog.services.book_instances.create(form).await);
    let FormOutcome::Invalid(view) = outcome else {
        panic!("expected the form back");
    };
    assert_eq!(view.errors[0].field, "book");
    assert_eq!(view.book_list.len(), 1);
    assert_eq!(view.bookinstance.status, "予約中");
}

#[tokio::test]
async fn test_book_instance_list_tolerates_dangling_book() {
    let catalog = catalog();
    let author = catalog.author("Natsume", "Soseki").await;
    let book = catalog.book("坊っちゃん", author, &[]).await;
    catalog.copy(book, "available").await;
    catalog
        .store
        .insert(
            Collection::BookInstances,
            json!({
                "book": Uuid::new_v4().to_string(),
                "imprint": "lost",
                "status": "reserved",
                "due_back": "2024-04-01",
            }),
        )
        .await
        .unwrap();

    let copies = assert_ok!(catalog.services.book_instances.list().await);
    assert_eq!(copies.len(), 2);
    assert!(copies[0].book.is_some());
    assert!(copies[1].book.is_none());
    assert_eq!(copies[1].due_back_formatted, "2024, 04, 01");
}

#[tokio::test]
async fn test_summary_counts() {
    let catalog = catalog();
    let author = catalog.author("Franz", "Kafka").await;
    catalog.genre("Absurdist").await;
    let book = catalog.book("Der Process", author, &[]).await;
    catalog.copy(book, "available").await;
    catalog.copy(book, "on_loan").await;
    catalog.copy(book, "貸出可").await;

    let summary = assert_ok!(catalog.services.summary.counts().await);
    assert_eq!(summary.book_count, 1);
    assert_eq!(summary.book_instance_count, 3);
    assert_eq!(summary.book_instance_available_count, 2);
    assert_eq!(summary.author_count, 1);
    assert_eq!(summary.genre_count, 1);
}

#[tokio::test]
async fn test_update_of_missing_author_is_not_found() {
    let catalog = catalog();
    let form = AuthorForm {
        first_name: "Jane".to_string(),
        family_name: "Doe".to_string(),
        ..AuthorForm::default()
    };
    let err = assert_err!(catalog.services.authors.update(Uuid::new_v4(), form).await);
    assert_eq!(not_found_message(err), "no such author");
}
